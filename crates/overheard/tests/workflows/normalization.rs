use super::*;

#[tokio::test]
async fn test_bulk_archive_drop_in() -> TestResult<()> {
  // Files laid out like arXiv's bulk source data need no fetching at all.
  let server = Server::new_async().await;
  let (overheard, dir) = create_test_overheard(&server);
  let root = dir.path();

  let old = source_path(root, "0701", "astro-ph0701864.gz");
  fs::create_dir_all(old.parent().unwrap())?;
  fs::write(&old, gzip(b"% caf\xe9 au lait\nbody % r\xe9sum\xe9\n"))?;

  let ids = ["astro-ph/0701864"];
  assert!(!overheard.fetch_all(&ids, Duration::from_secs(60), false).await?);
  assert_eq!(overheard.extract_all(&ids).await?, 1);

  // ISO-8859-1 text falls through to the second configured encoding
  let id: ArxivId = "astro-ph/0701864".parse()?;
  let comments = overheard.scraper().comments(&id)?;
  assert_eq!(comments.long[0].text(), "% caf\u{e9} au lait");
  assert_eq!(comments.short[0].text(), "% r\u{e9}sum\u{e9}");
  Ok(())
}

#[tokio::test]
async fn test_forced_refetch_replaces_artifact() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let pdf = serve(&mut server, "1211.2577", b"%PDF-1.4\n".to_vec()).await;
  let (overheard, dir) = create_test_overheard(&server);
  let id: ArxivId = "1211.2577".parse()?;

  assert!(overheard.fetcher().fetch(&id, false).await?);
  pdf.assert_async().await;
  pdf.remove_async().await;

  let gz = serve(&mut server, "1211.2577", gzip(b"% now with source\n")).await;
  assert!(!overheard.fetcher().fetch(&id, false).await?);
  assert!(overheard.fetcher().fetch(&id, true).await?);
  gz.assert_async().await;

  let root = dir.path();
  assert!(!source_path(root, "1211", "1211.2577.pdf").exists());
  assert!(source_path(root, "1211", "1211.2577.gz").is_file());

  overheard.extractor().extract(&id).await?;
  assert_eq!(overheard.scraper().long_comments(&id)?[0].text(), "% now with source");
  Ok(())
}

#[tokio::test]
async fn test_ambiguous_artifact_aborts_extraction() -> TestResult<()> {
  let server = Server::new_async().await;
  let (overheard, dir) = create_test_overheard(&server);
  let root = dir.path();

  for file in ["1211.1574.gz", "1211.1574.pdf"] {
    let path = source_path(root, "1211", file);
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, b"x")?;
  }

  let result = overheard.extract_all(&["1211.1574"]).await;
  assert!(matches!(result, Err(OverheardError::AmbiguousArtifact { .. })));
  let result = overheard.fetch_all(&["1211.1574"], Duration::ZERO, false).await;
  assert!(matches!(result, Err(OverheardError::AmbiguousArtifact { .. })));
  Ok(())
}

#[tokio::test]
async fn test_escaped_percent_survives_pipeline() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let paper = serve(
    &mut server,
    "1211.1574",
    gzip(b"a 50\\% increase\nrow \\\\% real comment\n  % indented long\n"),
  )
  .await;
  let (overheard, _dir) = create_test_overheard(&server);
  let ids = ["1211.1574"];

  let mut long = Vec::new();
  let mut short = Vec::new();
  overheard.process(&ids, Duration::ZERO, false, &mut long, &mut short).await?;
  paper.assert_async().await;

  assert_eq!(String::from_utf8(long)?, "% indented long\n\n");
  assert_eq!(String::from_utf8(short)?, "% real comment\n");
  Ok(())
}
