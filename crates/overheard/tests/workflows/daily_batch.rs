use std::collections::BTreeMap;

use overheard::scrape::Comments;

use super::*;

#[tokio::test]
async fn test_mixed_batch() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let mocks = vec![
    serve(
      &mut server,
      "1211.1574",
      gzip(b"\\section{Results}\n% TODO fix typo\ndone\nvalue = 5 % in meters\n"),
    )
    .await,
    serve(&mut server, "1211.2577", b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec()).await,
    serve(
      &mut server,
      "astro-ph/0701019v2",
      tarball(&[
        ("ms.tex", b"\\input{appendix}\n% draft note\n%   second line\n"),
        ("appendix.tex", b"x % aside\n"),
        ("figs/plot.tex", b"% nested, ignored\n"),
        ("refs.bib", b"% not latex\n"),
      ]),
    )
    .await,
    serve(&mut server, "1211.4164", vec![0x00, 0x01, 0x02, 0xff]).await,
  ];
  let missing = server
    .mock("GET", "/e-print/1211.0404")
    .with_status(404)
    .expect(1)
    .create_async()
    .await;

  let (overheard, dir) = create_test_overheard(&server);
  let ids = ["1211.1574", "1211.2577", "astro-ph/0701019v2", "1211.4164", "1211.0404", "bad id"];

  assert!(overheard.fetch_all(&ids, Duration::ZERO, false).await?);
  for mock in &mocks {
    mock.assert_async().await;
  }
  missing.assert_async().await;

  let root = dir.path();
  assert!(source_path(root, "1211", "1211.1574.gz").is_file());
  assert!(source_path(root, "1211", "1211.2577.pdf").is_file());
  assert!(source_path(root, "0701", "astro-ph0701019v2.gz").is_file());
  // unrecognized downloads and failed requests leave nothing behind
  let partition: Vec<_> = fs::read_dir(root.join("source").join("1211"))?
    .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
    .collect::<Result<_, _>>()?;
  assert_eq!(partition.len(), 2, "{partition:?}");

  assert_eq!(overheard.extract_all(&ids).await?, 3);
  assert_eq!(fs::read(latex_path(root, "1211", "1211.2577.tex"))?, b"");
  assert_eq!(
    fs::read_to_string(latex_path(root, "0701", "astro-ph0701019v2.tex"))?,
    "x % aside\n\\input{appendix}\n% draft note\n%   second line\n"
  );
  assert!(!latex_path(root, "1211", "1211.4164.tex").exists());
  assert_eq!(fs::read_dir(root.join("scratch"))?.count(), 0);

  let mut long = Vec::new();
  let mut short = Vec::new();
  let snapshot = root.join("comments.json");
  overheard.write_output(&ids, &mut long, &mut short, Some(&snapshot))?;

  assert_eq!(
    String::from_utf8(long)?,
    "% TODO fix typo\n\n% draft note\n%   second line\n\n"
  );
  assert_eq!(String::from_utf8(short)?, "% in meters\n% aside\n");

  let saved: BTreeMap<String, Comments> = serde_json::from_str(&fs::read_to_string(snapshot)?)?;
  assert_eq!(
    saved.keys().map(String::as_str).collect::<Vec<_>>(),
    ["1211.1574", "1211.2577", "astro-ph/0701019v2"]
  );
  assert!(saved["1211.2577"].is_empty());
  Ok(())
}

#[tokio::test]
async fn test_process_is_resumable() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let paper = serve(
    &mut server,
    "1211.1574",
    tarball(&[("paper.tex", b"results\n% TODO fix typo\ndone\n")]),
  )
  .await;
  let (overheard, dir) = create_test_overheard(&server);
  let ids = ["1211.1574"];

  let mut long = Vec::new();
  let mut short = Vec::new();
  overheard.process(&ids, Duration::ZERO, false, &mut long, &mut short).await?;
  assert_eq!(long, b"% TODO fix typo\n\n");
  assert!(short.is_empty());

  // losing the normalized tree costs nothing but a re-extraction
  fs::remove_dir_all(dir.path().join("latex"))?;
  let mut long = Vec::new();
  let mut short = Vec::new();
  overheard.process(&ids, Duration::ZERO, false, &mut long, &mut short).await?;
  assert_eq!(long, b"% TODO fix typo\n\n");

  paper.assert_async().await;
  Ok(())
}

#[tokio::test]
async fn test_missing_user_agent_aborts_batch() -> TestResult<()> {
  let server = Server::new_async().await;
  let dir = tempdir()?;
  let config = Config::default()
    .with_base_url(format!("{}/e-print/", server.url()))
    .with_source_root(dir.path().join("source"))
    .with_latex_root(dir.path().join("latex"));
  let overheard = Overheard::with_sniffer(config, MagicBytes)?;

  let result = overheard.fetch_all(&["1211.1574", "1211.2577"], Duration::ZERO, false).await;
  assert!(matches!(result, Err(OverheardError::Configuration(_))));
  Ok(())
}

#[ignore = "Downloads from arxiv.org and needs the `file` utility."]
#[tokio::test]
async fn test_live_arxiv() -> TestResult<()> {
  let dir = tempdir()?;
  let config = Config::default()
    .with_user_agent(USER_AGENT)
    .with_source_root(dir.path().join("source"))
    .with_latex_root(dir.path().join("latex"));
  let overheard = Overheard::new(config)?;
  let ids = ["1211.1574"];

  assert!(overheard.fetch_all(&ids, Duration::from_secs(1), false).await?);
  assert_eq!(overheard.extract_all(&ids).await?, 1);
  assert!(latex_path(dir.path(), "1211", "1211.1574.tex").is_file());
  Ok(())
}
