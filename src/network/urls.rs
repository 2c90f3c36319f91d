pub const PROFILE_PATH: &str = "/profile";
pub const LISTS_PATH: &str = "/user/{user_id}/lists";
pub const WATCHLIST_PATH: &str = "/user/{user_id}/watchlist";
pub const RATINGS_PATH: &str = "/user/{user_id}/ratings/";
pub const LIST_PATH: &str = "/list/{list_id}/";
pub const EXPORT_SUFFIX: &str = "export";
