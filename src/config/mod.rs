pub mod modes;
pub mod settings;

use settings::Settings;
use std::path::Path;

/// Settings file looked up in the working directory when none is given.
pub const SETTINGS_FILE_NAME: &str = "tessy.yaml";

/// 設定ファイルを読み込む。
///
/// `path` が指定されればそのファイルを読み込む。未指定の場合は
/// カレントディレクトリの `tessy.yaml` を探し、存在しなければデフォルト設定を返す。
pub fn load_settings(path: Option<&Path>) -> crate::error::Result<Settings> {
    if let Some(path) = path {
        return Settings::from_file(path);
    }

    let default_path = Path::new(SETTINGS_FILE_NAME);
    if default_path.is_file() {
        Settings::from_file(default_path)
    } else {
        Ok(Settings::default())
    }
}
