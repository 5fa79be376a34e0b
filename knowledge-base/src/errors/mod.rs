pub mod kb_error;
