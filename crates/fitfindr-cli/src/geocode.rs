use fitfindr_core::AppConfig;

/// Geocode `query` and print the match, or report that nothing matched.
///
/// A miss is not an error; the command still exits successfully.
///
/// # Errors
///
/// Returns an error if the geocoder cannot be built from config.
pub(crate) async fn run_geocode(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let geocoder = fitfindr_geo::build_geocoder(config)?;
    match geocoder.geocode_address(query).await {
        Some(result) => {
            println!("{}", result.coordinates);
            println!("{}", result.display_name);
        }
        None => println!("no match for '{query}'"),
    }
    Ok(())
}
