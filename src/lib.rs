pub mod errors;
pub mod seat_checker;
pub mod seat_parser;

pub mod data_structs {
    pub mod app_config;
    pub mod course_watch;
    pub mod seat_response;
}
