pub mod use_auto_dismiss;
