pub mod remote;

// 便利のため、よく使用される型を再エクスポート
pub use remote::{
    clean_object_path, MockRemoteClient, RecordedCall, RemoteClient, ReqwestRemoteClient,
};
