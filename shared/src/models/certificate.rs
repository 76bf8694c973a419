//! Certificate entity and its sub-records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurement unit for a product line item (closed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProductUnit {
    #[default]
    #[serde(rename = "KGS")]
    Kgs,
    #[serde(rename = "PCS")]
    Pcs,
    #[serde(rename = "BOX")]
    Box,
}

impl ProductUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductUnit::Kgs => "KGS",
            ProductUnit::Pcs => "PCS",
            ProductUnit::Box => "BOX",
        }
    }
}

/// A product line item on a certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub description: String,
    /// Decimal string as entered; may carry a thousands separator
    /// (e.g. "4,285.00") or a decimal comma (e.g. "2,5").
    pub quantity: String,
    #[serde(default)]
    pub unit: ProductUnit,
}

/// Header information for a certificate
///
/// Closed record shape: every field is enumerated here, there is no
/// dynamic field access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    /// Human-assigned business key, unique across all certificates
    pub certificate_number: String,
    pub exporter_name: String,
    pub exporter_address: String,
    pub consignee_name: String,
    pub consignee_address: String,
    pub consignee_country: String,
    pub transport_details: String,
    pub country_of_origin: String,
    pub place_and_date_of_issue: String,
}

/// Invoice block of a certificate
///
/// `total_packages` and `total_weight` are derived values, recomputed
/// from the product list on every save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetails {
    pub total_packages: String,
    pub total_weight: String,
    pub invoice_number: String,
    pub invoice_date: String,
}

/// A trade/export certificate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certificate {
    pub id: Uuid,
    /// Globally unique external reference token, distinct from `id`;
    /// regenerable without touching any other field.
    pub guid: String,
    pub info: CertificateInfo,
    pub products: Vec<Product>,
    pub invoice: InvoiceDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CertificateInfo {
    /// Required fields with their values, for validation error reporting
    pub fn required_fields(&self) -> [(&'static str, &str); 9] {
        [
            ("certificateNumber", &self.certificate_number),
            ("exporterName", &self.exporter_name),
            ("exporterAddress", &self.exporter_address),
            ("consigneeName", &self.consignee_name),
            ("consigneeAddress", &self.consignee_address),
            ("consigneeCountry", &self.consignee_country),
            ("transportDetails", &self.transport_details),
            ("countryOfOrigin", &self.country_of_origin),
            ("placeAndDateOfIssue", &self.place_and_date_of_issue),
        ]
    }
}
