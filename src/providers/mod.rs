pub mod awesome_api;
pub mod bcb;
pub mod hg_brasil;
pub mod http;
pub mod ibge;
pub mod world_bank;
