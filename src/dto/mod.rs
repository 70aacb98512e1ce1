pub mod save_dto;
