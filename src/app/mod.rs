pub mod crosswalk_service;
pub mod db;
pub mod error;
pub mod file_storage;
pub mod road_service;
