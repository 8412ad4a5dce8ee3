// Application layer - Use cases and source ports
pub mod activity_repository;
pub mod feed_service;
pub mod refresh;
