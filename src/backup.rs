use chrono::Local;
use futures::TryStreamExt;
use std::path::PathBuf;

use crate::archive;
use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::network::Network;

/// Log in, export every list one after another and zip them up.
///
/// Lists are discovered and downloaded only as the archive writer asks for
/// the next one. Returns the path of the written archive.
pub async fn backup(conf: &Config) -> Result<PathBuf> {
    let credentials = Credentials::load(&conf.cookies_file, &conf.required_cookies)?;
    let network = Network::new(conf, &credentials)?;

    let user_id = network.fetch_user_id().await?;
    println!("Successfully logged in as user {}", user_id);

    let lists = network
        .discover_lists(&user_id)
        .and_then(|list| network.export_list(list));
    archive::write_archive(&conf.output_file, lists, Local::now().naive_local()).await?;

    Ok(conf.output_file.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::network::discover::tests::mount_site;
    use crate::network::tests::test_config;
    use std::fs::{self, File};
    use std::io::Read;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use zip::ZipArchive;

    async fn mount_profile(server: &MockServer) {
        Mock::given(method("HEAD"))
            .and(path("/profile"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/user/ur12345678/"),
            )
            .mount(server)
            .await;
    }

    async fn mount_export(server: &MockServer, list_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{}export", list_path)))
            .and(header("cookie", "id=secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    fn config_in(server: &MockServer, dir: &tempfile::TempDir) -> Config {
        let cookies_file = dir.path().join("imdb_cookie.txt");
        fs::write(&cookies_file, "secret\n").unwrap();
        Config {
            cookies_file,
            output_file: dir.path().join("imdb_exported_lists.zip"),
            ..test_config(server)
        }
    }

    #[tokio::test]
    async fn backs_up_every_list() {
        let server = MockServer::start().await;
        mount_profile(&server).await;
        mount_site(&server).await;
        mount_export(&server, "/user/ur12345678/ratings/", "ratings csv").await;
        mount_export(&server, "/list/ls999/", "watchlist csv").await;
        mount_export(&server, "/list/ls1000001/", "list a csv").await;
        mount_export(&server, "/list/ls1000002/", "two line csv").await;

        let dir = tempfile::tempdir().unwrap();
        let conf = config_in(&server, &dir);
        let written = backup(&conf).await.unwrap();
        assert_eq!(written, conf.output_file);

        let mut archive = ZipArchive::new(File::open(&written).unwrap()).unwrap();
        assert_eq!(archive.len(), 5);

        let mut contents = String::new();
        archive
            .by_name("ls1000001_my-list-a.csv")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "list a csv");

        let mut manifest = String::new();
        archive
            .by_name("lists.txt")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        let first_lines: Vec<&str> = manifest.lines().take(3).collect();
        assert_eq!(
            first_lines,
            vec![
                "ur12345678_ratings.csv: Ratings",
                "ur12345678_watchlist.csv: Watchlist",
                "ls1000001_my-list-a.csv: My List A",
            ]
        );
    }

    #[tokio::test]
    async fn failed_export_aborts_without_archive() {
        let server = MockServer::start().await;
        mount_profile(&server).await;
        mount_site(&server).await;
        mount_export(&server, "/user/ur12345678/ratings/", "ratings csv").await;
        Mock::given(method("GET"))
            .and(path("/list/ls999/export"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let conf = config_in(&server, &dir);
        let err = backup(&conf).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!conf.output_file.exists());
    }

    #[tokio::test]
    async fn rejected_cookie_stops_before_discovery() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let conf = config_in(&server, &dir);
        let err = backup(&conf).await.unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed { .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_cookie_file_is_config_error() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let conf = Config {
            cookies_file: dir.path().join("missing.txt"),
            ..test_config(&server)
        };
        let err = backup(&conf).await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
