//---------------------------------------
pub mod web_api {
    pub mod routes;
    pub mod controllers;
    pub mod json_body;
}

pub use web_api::routes::map_routes;
pub use web_api::controllers::*;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod models;
    pub mod dto;
    pub mod validation;
    pub mod api_error;
}

pub use shared::models::*;
pub use shared::dto::*;
pub use shared::{api_error, validation};
//---------------------------------------

//---------------------------------------
pub mod authentication {
    pub mod auth;
}
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod data_context;
    pub mod data_error;
    pub mod task_batch;
}
//---------------------------------------

//---------------------------------------
pub mod services {
    pub mod task_reordering;
}
//---------------------------------------
