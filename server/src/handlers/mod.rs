pub mod fallback;
pub mod posts;

pub use fallback::not_found;
pub use posts::{hashtag_path, my_posts, search_hashtag, MY_POSTS_PATH};
