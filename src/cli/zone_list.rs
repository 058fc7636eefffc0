use crate::core::zones::{ZoneId, ZoneRegistry};

/// One row per zone: number, id, metaphor and tagline. The default zone is starred.
pub fn format_zone_list(registry: &ZoneRegistry, default_zone: ZoneId) -> Vec<String> {
    let id_width = ZoneId::ALL
        .iter()
        .map(|zone| zone.as_str().len())
        .max()
        .unwrap_or(0);
    let metaphor_width = registry
        .iter()
        .map(|persona| persona.metaphor.chars().count())
        .max()
        .unwrap_or(0);

    registry
        .iter()
        .map(|persona| {
            let marker = if persona.id == default_zone { "*" } else { " " };
            format!(
                "{marker} {}  {:<id_width$}  {:<metaphor_width$}  {}",
                registry.number(persona.id),
                persona.id.as_str(),
                persona.metaphor,
                persona.tagline,
            )
        })
        .collect()
}

pub fn list_zones(registry: &ZoneRegistry, default_zone: ZoneId) {
    println!("Available zones:");
    for line in format_zone_list(registry, default_zone) {
        println!("  {line}");
    }
    println!();
    println!("* default zone (change with: fivepoints set default-zone <zone>)");
}
