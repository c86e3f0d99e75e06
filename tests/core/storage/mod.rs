// Storage integration tests

mod test_indexing;
mod test_lifecycle;
