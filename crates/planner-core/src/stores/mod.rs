//! Domain state containers.
//!
//! Each store is a clone-cheap handle over `Rc<RefCell<_>>` state plus the
//! API client. The UI reads snapshots every frame; async operations borrow
//! the state only between awaits, never across one.

pub mod chat;
pub mod meal_plan;
pub mod recipes;

pub use chat::ChatStore;
pub use meal_plan::MealPlanStore;
pub use recipes::RecipeStore;
