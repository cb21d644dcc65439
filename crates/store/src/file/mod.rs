pub mod document_db;
