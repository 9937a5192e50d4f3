use fake::Fake;
use fake::faker::address::raw::{CityName, StreetName};
use fake::faker::company::raw::CompanyName;
use fake::faker::job::raw::Title;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::{EN, PT_BR};
use rand::Rng;

use crate::errors::GenerationError;
use crate::faker_rs::locales::LocaleKey;

const DEFAULT_LOCALE: LocaleKey = LocaleKey::EnUs;

/// Independent draws of personal and business fields from `fake`.
///
/// No cross-field consistency is implied: a first name and a company are
/// drawn separately every time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFaker {
    locale: LocaleKey,
}

macro_rules! locale_draw {
    ($self:ident, $rng:ident, $faker:ident) => {
        match $self.locale {
            LocaleKey::EnUs => $faker(EN).fake_with_rng::<String, _>($rng),
            LocaleKey::PtBr => $faker(PT_BR).fake_with_rng::<String, _>($rng),
        }
    };
}

impl ContactFaker {
    pub fn new(locale: LocaleKey) -> Self {
        Self { locale }
    }

    /// Resolve a locale name, falling back to `en_US` when absent.
    pub fn resolve(locale: Option<&str>) -> Result<Self, GenerationError> {
        let locale_str = locale.unwrap_or_else(|| DEFAULT_LOCALE.as_str());
        let locale_key = LocaleKey::parse(locale_str).ok_or_else(|| {
            GenerationError::InvalidConfig(format!("unsupported faker locale '{}'", locale_str))
        })?;
        Ok(Self::new(locale_key))
    }

    pub fn locale(&self) -> LocaleKey {
        self.locale
    }

    pub fn first_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        locale_draw!(self, rng, FirstName)
    }

    pub fn last_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        locale_draw!(self, rng, LastName)
    }

    pub fn company<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        locale_draw!(self, rng, CompanyName)
    }

    pub fn job_title<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        locale_draw!(self, rng, Title)
    }

    pub fn street_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        locale_draw!(self, rng, StreetName)
    }

    pub fn city<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        locale_draw!(self, rng, CityName)
    }
}
