pub mod directory_repo;
