use anyhow::{ensure, Context};
use colored::Colorize;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_DISPOSITION, LOCATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use resreg_server::{ResumeRegistryServer, ServerConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Smoke(args) => cmd_smoke(args).await,
    }
}

fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    println!(
        "{} Resume registry on {} (max upload {} bytes)",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.max_upload_size,
    );
    ResumeRegistryServer::in_memory(config).serve().await?;
    Ok(())
}

async fn cmd_smoke(args: SmokeArgs) -> anyhow::Result<()> {
    let client = Client::new();
    run_smoke(&client, args.url.trim_end_matches('/'), &args.email).await?;
    println!("{} All checks passed.", "✓".green().bold());
    Ok(())
}

/// Upload two versions, read them back, delete, and confirm the history is gone.
async fn run_smoke(client: &Client, api: &str, email: &str) -> anyhow::Result<()> {
    const FIRST: &str = "smoke: first resume version";
    const SECOND: &str = "smoke: second resume version";

    upload(client, api, email, FIRST).await?;
    step("uploaded first version");
    upload(client, api, email, SECOND).await?;
    step("uploaded second version");

    let current = download(client, &format!("{api}/resume/current"), email, "current.txt").await?;
    ensure!(current == SECOND.as_bytes(), "current resume does not match the second upload");
    step("current version matches");

    let first = download(client, &format!("{api}/resume/1"), email, "resume_v1.txt").await?;
    ensure!(first == FIRST.as_bytes(), "version 1 does not match the first upload");
    step("version 1 matches");

    let response = client
        .delete(format!("{api}/resume/delete"))
        .query(&[("email", email)])
        .send()
        .await
        .context("delete request failed")?;
    ensure!(
        response.status() == StatusCode::NO_CONTENT,
        "expected {}, got {}",
        StatusCode::NO_CONTENT,
        response.status()
    );
    step("deleted all versions");

    let response = client
        .get(format!("{api}/resume/current"))
        .query(&[("email", email)])
        .send()
        .await
        .context("lookup after delete failed")?;
    ensure!(
        response.status() == StatusCode::NOT_FOUND,
        "expected {} after delete, got {}",
        StatusCode::NOT_FOUND,
        response.status()
    );
    step("current version gone after delete");
    Ok(())
}

fn step(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

async fn upload(client: &Client, api: &str, email: &str, text: &str) -> anyhow::Result<()> {
    let form = Form::new().text("email", email.to_string()).part(
        "body",
        Part::bytes(text.as_bytes().to_vec()).file_name("resume.txt"),
    );
    let response = client
        .post(format!("{api}/resume"))
        .multipart(form)
        .send()
        .await
        .context("upload request failed")?;

    ensure!(
        response.status() == StatusCode::CREATED,
        "expected {}, got {}",
        StatusCode::CREATED,
        response.status()
    );
    ensure!(
        response.headers().contains_key(LOCATION),
        "no Location header in upload response"
    );
    Ok(())
}

async fn download(
    client: &Client,
    url: &str,
    email: &str,
    expected_file: &str,
) -> anyhow::Result<Vec<u8>> {
    let response = client
        .get(url)
        .query(&[("email", email)])
        .header(ACCEPT, "application/octet-stream")
        .send()
        .await
        .with_context(|| format!("download from {url} failed"))?;

    ensure!(
        response.status() == StatusCode::OK,
        "expected {} from {url}, got {}",
        StatusCode::OK,
        response.status()
    );
    expect_file_name(response.headers(), expected_file)?;
    Ok(response.bytes().await?.to_vec())
}

fn expect_file_name(headers: &HeaderMap, expected: &str) -> anyhow::Result<()> {
    let values: Vec<_> = headers.get_all(CONTENT_DISPOSITION).iter().collect();
    ensure!(!values.is_empty(), "no Content-Disposition header in response");
    ensure!(values.len() == 1, "more than one Content-Disposition header");

    let value = values[0].to_str().context("Content-Disposition is not valid text")?;
    ensure!(
        value.contains(&format!("filename={expected}")),
        "Content-Disposition header {value:?} was expected to contain filename={expected}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::io::Write;

    #[test]
    fn file_name_present() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=current.txt"),
        );
        expect_file_name(&headers, "current.txt").unwrap();
        assert!(expect_file_name(&headers, "resume_v1.txt").is_err());
    }

    #[test]
    fn file_name_header_missing_or_repeated() {
        let mut headers = HeaderMap::new();
        assert!(expect_file_name(&headers, "current.txt").is_err());

        headers.append(CONTENT_DISPOSITION, HeaderValue::from_static("attachment; filename=current.txt"));
        headers.append(CONTENT_DISPOSITION, HeaderValue::from_static("attachment; filename=current.txt"));
        let err = expect_file_name(&headers, "current.txt").unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn bind_flag_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"127.0.0.1:7000\"").unwrap();
        writeln!(file, "max_upload_size = 2048").unwrap();

        let args = ServeArgs { bind: None, config: Some(file.path().to_path_buf()) };
        let config = server_config(&args).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(config.max_upload_size, 2048);

        let args = ServeArgs {
            bind: Some("127.0.0.1:7001".parse().unwrap()),
            config: Some(file.path().to_path_buf()),
        };
        assert_eq!(server_config(&args).unwrap().bind_addr, "127.0.0.1:7001".parse().unwrap());
    }

    #[tokio::test]
    async fn smoke_against_live_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = ResumeRegistryServer::in_memory(ServerConfig::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_listener(listener, async move {
            let _ = rx.await;
        }));

        let client = Client::builder().no_proxy().build().unwrap();
        run_smoke(&client, &format!("http://{addr}/api"), "smoke@example.com")
            .await
            .unwrap();

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
