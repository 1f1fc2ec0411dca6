pub mod mock_es_server;
pub mod test_data;
