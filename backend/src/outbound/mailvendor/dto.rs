//! DTOs for the print-and-mail vendor API.

use serde::{Deserialize, Serialize};

use crate::domain::MailingAddress;
use crate::domain::ports::{PostcardOrder, PrintTemplate};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TemplateListDto {
    #[serde(default)]
    pub(super) templates: Vec<TemplateDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TemplateDto {
    pub(super) id: String,
    pub(super) name: String,
}

impl TemplateListDto {
    pub(super) fn into_templates(self) -> Vec<PrintTemplate> {
        self.templates
            .into_iter()
            .map(|template| PrintTemplate {
                id: template.id,
                name: template.name,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitOrderDto<'a> {
    pub(super) template_id: &'a str,
    pub(super) message: &'a str,
    pub(super) to: AddressDto<'a>,
    pub(super) from: AddressDto<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AddressDto<'a> {
    pub(super) name: &'a str,
    pub(super) line1: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) line2: Option<&'a str>,
    pub(super) city: &'a str,
    pub(super) state: &'a str,
    pub(super) postal_code: &'a str,
}

impl<'a> AddressDto<'a> {
    pub(super) fn from_domain(name: &'a str, address: &'a MailingAddress) -> Self {
        Self {
            name,
            line1: &address.line1,
            line2: address.line2.as_deref(),
            city: &address.city,
            state: &address.state,
            postal_code: &address.postal_code,
        }
    }
}

impl<'a> SubmitOrderDto<'a> {
    pub(super) fn from_order(order: &'a PostcardOrder) -> Self {
        Self {
            template_id: &order.template_id,
            message: &order.message,
            to: AddressDto::from_domain(&order.recipient_name, &order.recipient_address),
            from: AddressDto::from_domain(&order.sender_name, &order.sender_address),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitResponseDto {
    pub(super) id: String,
}
