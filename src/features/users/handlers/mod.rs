pub mod user_handler;

pub use user_handler::{
    __path_create_user, __path_get_me, __path_get_user, __path_list_users, __path_login,
    create_user, get_me, get_user, list_users, login,
};
