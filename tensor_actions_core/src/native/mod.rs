// Native implementations

pub mod rpc_impl;
pub mod tensor_api;

pub use rpc_impl::NativeChainClient;
pub use tensor_api::TensorApiClient;
