/// Terminal front end: keyboard, gamepad, text prompts, drawing and sound.

pub mod gamepad;
pub mod input;
pub mod prompt;
pub mod renderer;
pub mod sound;
