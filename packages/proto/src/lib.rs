//! Generated gRPC stubs for services Prizeflow talks to.

pub mod directory {
    tonic::include_proto!("directory");
}
