use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ProspectRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) domain: Option<String>,
    pub(crate) industry: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) employee_range: Option<String>,
    pub(crate) revenue_range: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ProspectRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<ProspectRow>() {
        let row = record?;

        // Rows without a provider id cannot be deduplicated downstream.
        let id = match row.id {
            Some(id) => id,
            None => continue,
        };
        let name = match row.name {
            Some(name) => name,
            None => continue,
        };

        records.push(ProspectRecord {
            id,
            name,
            domain: row.website,
            industry: row.industry,
            location: row.location,
            employee_range: row.employees,
            revenue_range: row.annual_revenue,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ProspectRow {
    #[serde(rename = "Company ID", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "Company", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Website", default, deserialize_with = "empty_string_as_none")]
    website: Option<String>,
    #[serde(rename = "Industry", default, deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(rename = "Employees", default, deserialize_with = "empty_string_as_none")]
    employees: Option<String>,
    #[serde(
        rename = "Annual Revenue",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    annual_revenue: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
