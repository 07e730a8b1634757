//! Host-level tests: channel transport and full request flows over in-memory pipes

mod channel_transport_tests;
