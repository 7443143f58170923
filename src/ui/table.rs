use crate::destination::Destination;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct DestinationRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Coordinates")]
    pub coordinates: String,
    #[tabled(rename = "Saved")]
    pub saved: String,
    #[tabled(rename = "Id")]
    pub id: String,
}

impl From<&Destination> for DestinationRow {
    fn from(d: &Destination) -> Self {
        Self {
            name: d.name.clone(),
            address: d.address.clone(),
            coordinates: d.coordinate().to_string(),
            saved: d.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: d.id.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Listing of destinations in the order given
pub fn destinations_table(destinations: &[Destination]) -> String {
    if destinations.is_empty() {
        return String::new();
    }

    let rows: Vec<DestinationRow> = destinations.iter().map(DestinationRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Every field of one destination, one per row
pub fn destination_detail_table(destination: &Destination) -> String {
    let fields = [
        ("Id", destination.id.to_string()),
        ("Name", destination.name.clone()),
        ("Address", destination.address.clone()),
        ("Latitude", destination.latitude.to_string()),
        ("Longitude", destination.longitude.to_string()),
        ("Saved", destination.created_at.to_rfc3339()),
    ];

    let rows: Vec<FieldRow> = fields
        .into_iter()
        .map(|(field, value)| FieldRow {
            field: field.to_string(),
            value,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
