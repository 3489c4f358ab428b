use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(data_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = data_dir {
        return Some(dir.join(".env"));
    }
    Some(home_dir?.join(".familia-no-altar.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("ALTAR_DATA_DIR").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_the_data_dir() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/srv/altar")),
            Some(PathBuf::from("/home/alice")),
        );

        let want = Some(PathBuf::from("/srv/altar/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_home_when_data_dir_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/.familia-no-altar.env"));
        assert_eq!(got, want);
    }
}
