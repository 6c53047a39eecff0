//! Color classification into importance levels.

mod classifier;
mod color;

pub use classifier::{classify, ClassifierConfig, ColorClassifier, Level, LevelColors};
pub use color::{hue_name, Hsl, Rgb};
