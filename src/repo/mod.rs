pub mod garden;
pub mod inventory;
pub mod notification;
pub mod settings;
pub mod task;

pub use garden::*;
pub use inventory::*;
pub use notification::*;
pub use settings::*;
pub use task::*;