mod bridge;
mod lessons;
mod options;
mod render;
mod start;

type Res<T> = Result<T, String>;

fn err<T, S: ToString>(s: S) -> Res<T> {
    Err(s.to_string())
}
