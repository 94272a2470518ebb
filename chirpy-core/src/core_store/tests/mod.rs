/*
    Integration tests for core_store subsystem

    Test suite covering:
    - Identifier assignment and reuse
    - Persistence across reopen
    - Writer serialization under concurrency
    - Listing order
*/

pub mod persistence_tests;
