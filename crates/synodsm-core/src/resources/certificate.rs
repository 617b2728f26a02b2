// TLS certificates installed on the NAS and the services bound to them.

use serde_json::Value;
use synodsm_api::{DsmClient, Error, Params};

use crate::convert::{array_field, bool_field, field, response_data, str_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Core.Certificate.CRT";

const SYNOLOGY_ISSUER: &str = "Synology Inc.";
const LETS_ENCRYPT_ISSUER: &str = "Let's Encrypt";

#[derive(Debug, Clone, Default)]
pub struct Certificates {
    data: Value,
}

impl Resource for Certificates {
    const KIND: ResourceKind = ResourceKind::Certificate;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "list", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl Certificates {
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn certificates(&self) -> Vec<Certificate<'_>> {
        array_field(&self.data, "certificates")
            .iter()
            .map(Certificate)
            .collect()
    }

    /// Descriptions of every installed certificate.
    pub fn names(&self) -> Vec<&str> {
        self.certificates()
            .iter()
            .filter_map(Certificate::desc)
            .collect()
    }

    pub fn self_signed(&self) -> Vec<Certificate<'_>> {
        self.issued_by(SYNOLOGY_ISSUER)
    }

    pub fn lets_encrypt(&self) -> Vec<Certificate<'_>> {
        self.issued_by(LETS_ENCRYPT_ISSUER)
    }

    fn issued_by(&self, organization: &str) -> Vec<Certificate<'_>> {
        self.certificates()
            .into_iter()
            .filter(|cert| cert.issuer_organization() == Some(organization))
            .collect()
    }

    /// Service names bound to the certificate described as `desc`.
    pub fn services_by_certificate(&self, desc: &str) -> Vec<&str> {
        self.certificates()
            .into_iter()
            .filter(|cert| cert.desc() == Some(desc))
            .flat_map(|cert| cert.services())
            .collect()
    }

    /// Every bound service across all certificates.
    pub fn services(&self) -> Vec<&str> {
        self.certificates()
            .into_iter()
            .flat_map(|cert| cert.services())
            .collect()
    }
}

/// Borrowed view of one certificate.
#[derive(Debug, Clone, Copy)]
pub struct Certificate<'a>(&'a Value);

impl<'a> Certificate<'a> {
    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    pub fn desc(&self) -> Option<&'a str> {
        str_field(self.0, "desc")
    }

    pub fn is_default(&self) -> Option<bool> {
        bool_field(self.0, "is_default")
    }

    pub fn issuer_organization(&self) -> Option<&'a str> {
        field(self.0, "issuer").and_then(|issuer| str_field(issuer, "organization"))
    }

    pub fn subject_common_name(&self) -> Option<&'a str> {
        field(self.0, "subject").and_then(|subject| str_field(subject, "common_name"))
    }

    pub fn valid_till(&self) -> Option<&'a str> {
        str_field(self.0, "valid_till")
    }

    pub fn services(&self) -> Vec<&'a str> {
        array_field(self.0, "services")
            .iter()
            .filter_map(|svc| str_field(svc, "service"))
            .collect()
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}
