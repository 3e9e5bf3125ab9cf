mod actions;
mod defaults;
mod options;
mod render;
mod state;

pub use actions::{FormCommand, FormEvent, SubmitOutcome};
pub use defaults::{default_value, empty_value, generate_defaults, is_cleared};
pub use options::{
    CrossFieldValidator, FormOptions, SubmitHandler, ValidationMode, ValuesListener,
};
pub use render::RenderDecision;
pub use state::FormController;
