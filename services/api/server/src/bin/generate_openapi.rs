use fleet_api::openapi::FleetV1ApiDoc;

fn main() -> anyhow::Result<()> {
    let openapi = FleetV1ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&openapi)?;

    println!("{json}");
    Ok(())
}
