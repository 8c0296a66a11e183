//! DTOs for decoding civic lookup responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into the
//! domain [`Jurisdiction`] in one pass.

use serde::Deserialize;

use crate::domain::MailingAddress;
use crate::domain::location::{Jurisdiction, Location};
use crate::domain::officials::{OfficialKind, OfficialSnapshot};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupResponseDto {
    pub(super) location: LocationDto,
    #[serde(default)]
    pub(super) officials: Vec<OfficialDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationDto {
    pub(super) postal_code: String,
    pub(super) city: String,
    pub(super) state: String,
    #[serde(default)]
    pub(super) district: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OfficialDto {
    pub(super) name: String,
    pub(super) kind: String,
    pub(super) office: Option<OfficeAddressDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OfficeAddressDto {
    pub(super) line1: String,
    pub(super) line2: Option<String>,
    pub(super) city: String,
    pub(super) state: String,
    pub(super) postal_code: String,
}

impl LookupResponseDto {
    pub(super) fn into_jurisdiction(self) -> Result<Jurisdiction, String> {
        let location = Location {
            postal_code: self.location.postal_code,
            city: self.location.city,
            state: self.location.state,
            region: self.location.district,
        };

        // Officials with an unknown office kind are dropped rather than
        // failing the whole lookup; the roster upstream mixes state and
        // federal seats and only the federal kinds are addressable here.
        let officials = self
            .officials
            .into_iter()
            .filter_map(OfficialDto::into_snapshot)
            .collect();

        Ok(Jurisdiction {
            location,
            officials,
        })
    }
}

impl OfficialDto {
    fn into_snapshot(self) -> Option<OfficialSnapshot> {
        let kind: OfficialKind = self.kind.parse().ok()?;
        Some(OfficialSnapshot {
            name: self.name,
            kind,
            office: self.office.map(OfficeAddressDto::into_address),
        })
    }
}

impl OfficeAddressDto {
    fn into_address(self) -> MailingAddress {
        MailingAddress {
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
        }
    }
}
