// Indexer integration tests

mod test_dispatch;
