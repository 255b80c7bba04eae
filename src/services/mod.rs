pub mod auth_service;
pub use auth_service::{AuthError, AuthService, AuthenticatedUser};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod board_service;
pub use board_service::{
    ActionView, BoardError, BoardService, Identity, NewTask, TaskPatch, TaskView, UserRef,
};

pub mod board_service_impl;
pub use board_service_impl::SeaOrmBoardService;
