mod media_dto;

pub use media_dto::{
    get_extension_from_content_type, is_mime_type_allowed, MediaResponseDto, UpdateMediaDto,
    UploadMediaDto, ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};
