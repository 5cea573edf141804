use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(reports_home: Option<PathBuf>) -> Option<PathBuf> {
    Some(reports_home?.join(".env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let Some(path) = fallback_dotenv_path(env::var_os("REPORTS_HOME").map(PathBuf::from)) else {
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
    fn fallback_reads_env_file_in_reports_home() {
        let got = fallback_dotenv_path(Some(PathBuf::from("/workspace")));
        assert_eq!(got, Some(PathBuf::from("/workspace/.env")));
    }

    #[test]
    fn no_fallback_without_reports_home() {
        assert_eq!(fallback_dotenv_path(None), None);
    }
}
