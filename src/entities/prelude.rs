pub use super::actions::Entity as Actions;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
