use crate::types::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;

/// ファイルパスからBufReaderを作成する
/// パースやデータ変換は呼び出し側で行う
pub fn load_file(file_path: &str) -> ConfigResult<BufReader<File>> {
    let file = File::open(file_path).map_err(|_| ConfigError::missing_config_file(file_path))?;
    Ok(BufReader::new(file))
}

/// YAMLファイルからSerdeでDeserializeできる型を読み込む
pub fn load_yaml_from_file<T: DeserializeOwned>(file_path: &str) -> ConfigResult<T> {
    let buf_reader = load_file(file_path)?;
    serde_yaml::from_reader(buf_reader)
        .map_err(|e| ConfigError::invalid_settings_file(file_path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_load_existing_file() {
        // 存在するファイルを読み込めることを確認
        let result = load_file("Cargo.toml");
        assert!(result.is_ok(), "既存ファイルの読み込みに失敗");
    }

    #[test]
    fn test_load_non_existing_file() {
        // 存在しないファイルでエラーになることを確認
        let result = load_file("non_existent_file.yaml");
        assert!(
            matches!(result, Err(ConfigError::MissingConfigFile { .. })),
            "存在しないファイルでエラーにならなかった"
        );
    }

    #[test]
    fn test_load_yaml_parse_error() {
        // TOMLはYAMLのマップとして解釈できない
        let result = load_yaml_from_file::<HashMap<String, u64>>("Cargo.toml");
        assert!(matches!(result, Err(ConfigError::InvalidSettingsFile { .. })));
    }
}
