use serde::{de::DeserializeOwned, Serialize};

use crate::bridge::{event::InputEvent, Context};

mod control;
mod directional;
mod look_at;
mod perspective;
mod point_light;
mod points;
mod solar_system;
mod transform_2d;
mod triangle;

#[cfg(test)]
mod test;

/// Lessons in the order they build on each other.
pub const NAMES: [&str; 8] = [
    "points",
    "triangle",
    "transform_2d",
    "perspective",
    "camera",
    "directional_lighting",
    "point_lighting",
    "solar_system",
];

pub const DEFAULT: &str = "triangle";

pub trait Lesson {
    /// Draw one frame. `dt` is the time since the last frame in seconds.
    fn frame(&mut self, ctx: &Context, dt: f32) -> anyhow::Result<()>;

    fn input(&mut self, _event: &InputEvent) {}

    /// Current options as JSON.
    fn options(&self) -> String {
        String::from("{}")
    }

    /// Update options from a JSON object. Keys left out keep their values.
    fn set_options(&mut self, _json: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("This lesson has no options."))
    }

    /// Release GPU resources. The lesson must not be drawn afterwards.
    fn delete(&mut self);
}

pub fn is_known(name: &str) -> bool {
    NAMES.contains(&name)
}

/// Whether the lesson draws solid 3D models, needing the depth test and
/// back face culling. Flat lessons draw without either.
pub fn is_3d(name: &str) -> bool {
    matches!(
        name,
        "perspective" | "camera" | "directional_lighting" | "point_lighting" | "solar_system"
    )
}

pub fn create(name: &str, ctx: &Context) -> anyhow::Result<Box<dyn Lesson>> {
    let lesson: Box<dyn Lesson> = match name {
        "points" => Box::new(points::Points::new(ctx)?),
        "triangle" => Box::new(triangle::Triangle::new(ctx)?),
        "transform_2d" => Box::new(transform_2d::Transform2d::new(ctx)?),
        "perspective" => Box::new(perspective::Perspective::new(ctx)?),
        "camera" => Box::new(look_at::LookAt::new(ctx)?),
        "directional_lighting" => Box::new(directional::Directional::new(ctx)?),
        "point_lighting" => Box::new(point_light::PointLight::new(ctx)?),
        "solar_system" => Box::new(solar_system::SolarSystemLesson::new(ctx)?),
        _ => return Err(anyhow::anyhow!("Unknown lesson: {name}.")),
    };
    Ok(lesson)
}

fn to_json<T: Serialize>(options: &T) -> String {
    serde_json::to_string(options).unwrap_or_else(|_| String::from("{}"))
}

/// Overlay the keys of the JSON object `json` on `current`.
fn merge_options<T: Serialize + DeserializeOwned>(current: &T, json: &str) -> anyhow::Result<T> {
    let mut merged = serde_json::to_value(current)?;
    let update: serde_json::Value = serde_json::from_str(json)?;

    let (Some(target), serde_json::Value::Object(update)) = (merged.as_object_mut(), update)
    else {
        return Err(anyhow::anyhow!("Options must be a JSON object."));
    };

    for (key, value) in update {
        if !target.contains_key(&key) {
            return Err(anyhow::anyhow!("Unknown option: {key}."));
        }
        target.insert(key, value);
    }

    let options: T = serde_json::from_value(merged)?;

    // Numbers too large for f32 come out infinite, which serde_json writes
    // back as null.
    if contains_null(&serde_json::to_value(&options)?) {
        return Err(anyhow::anyhow!("Option values must be finite."));
    }

    Ok(options)
}

fn contains_null(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.iter().any(contains_null),
        serde_json::Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}
