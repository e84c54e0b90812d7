pub mod tag_handler;

pub use tag_handler::{
    __path_create_tag, __path_delete_tag, __path_list_tags, create_tag, delete_tag, list_tags,
};
