//! Report template configuration.
//!
//! An ordered list of page addresses plus the variable zones bound to them.
//! Page and zone lifecycles are linked: removing a page deletes its zones
//! and re-indexes zones on later pages, and reordering pages moves zones
//! with their page, so a zone never ends up pointing at a shifted index.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::variable::TemplateVariableZone;

/// Pages and variable zones of one report template.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTemplateConfig {
    /// Page image addresses, in output order.
    pub pages: Vec<String>,
    /// Variable zones across all pages. `page` is a 1-based index into
    /// `pages`.
    pub zones: Vec<TemplateVariableZone>,
}

impl ReportTemplateConfig {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            zones: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Appends a page at the end of the template.
    pub fn add_page(&mut self, address: impl Into<String>) {
        self.pages.push(address.into());
    }

    /// Replaces the image of an existing page; its zones stay in place.
    pub fn replace_page(&mut self, page: usize, address: impl Into<String>) -> Result<()> {
        let idx = self.page_index(page)?;
        self.pages[idx] = address.into();
        Ok(())
    }

    /// Removes a page, cascade-deleting its zones and re-indexing zones on
    /// later pages.
    pub fn remove_page(&mut self, page: usize) -> Result<()> {
        let idx = self.page_index(page)?;
        self.pages.remove(idx);
        self.zones.retain(|z| z.page != page);
        for zone in &mut self.zones {
            if zone.page > page {
                zone.page -= 1;
            }
        }
        Ok(())
    }

    /// Moves a page to a new position; zones follow their page.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        let from_idx = self.page_index(from)?;
        let to_idx = self.page_index(to)?;
        if from_idx == to_idx {
            return Ok(());
        }

        let address = self.pages.remove(from_idx);
        self.pages.insert(to_idx, address);

        for zone in &mut self.zones {
            zone.page = remap_page(zone.page, from, to);
        }
        Ok(())
    }

    /// Adds a zone after validating its page, area, and kind consistency.
    pub fn add_zone(&mut self, zone: TemplateVariableZone) -> Result<()> {
        self.validate_zone(&zone)?;
        self.zones.push(zone);
        Ok(())
    }

    /// Replaces every zone of one page wholesale.
    pub fn replace_page_zones(
        &mut self,
        page: usize,
        zones: Vec<TemplateVariableZone>,
    ) -> Result<()> {
        self.page_index(page)?;
        for zone in &zones {
            if zone.page != page {
                return Err(anyhow!(
                    "Zone for variable {} targets page {}, expected {}",
                    zone.variable,
                    zone.page,
                    page
                ));
            }
            self.validate_zone(zone)?;
        }
        self.zones.retain(|z| z.page != page);
        self.zones.extend(zones);
        Ok(())
    }

    /// Zones bound to one page, in insertion order.
    pub fn zones_for_page(&self, page: usize) -> impl Iterator<Item = &TemplateVariableZone> {
        self.zones.iter().filter(move |z| z.page == page)
    }

    fn validate_zone(&self, zone: &TemplateVariableZone) -> Result<()> {
        self.page_index(zone.page)
            .map_err(|_| anyhow!("Zone for variable {} targets missing page {}", zone.variable, zone.page))?;
        if zone.zone.is_empty() {
            return Err(anyhow!("Zone for variable {} has no area", zone.variable));
        }
        if !zone.kind_is_consistent() {
            return Err(anyhow!(
                "Variable {} requires a {:?} zone, got {:?}",
                zone.variable,
                zone.variable.kind(),
                zone.kind
            ));
        }
        Ok(())
    }

    /// Maps a 1-based page number to a pages index, or errors.
    fn page_index(&self, page: usize) -> Result<usize> {
        if page == 0 || page > self.pages.len() {
            return Err(anyhow!(
                "Page {} out of range (template has {} pages)",
                page,
                self.pages.len()
            ));
        }
        Ok(page - 1)
    }
}

/// New page number for a zone when its template's page `from` moves to `to`.
fn remap_page(zone_page: usize, from: usize, to: usize) -> usize {
    if zone_page == from {
        to
    } else if from < to && zone_page > from && zone_page <= to {
        zone_page - 1
    } else if from > to && zone_page >= to && zone_page < from {
        zone_page + 1
    } else {
        zone_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::variable::{VariableKind, VariablePath};
    use crate::zone::Zone;

    fn text_zone(page: usize, variable: VariablePath) -> TemplateVariableZone {
        TemplateVariableZone {
            zone: Zone::new(10.0, 10.0, 100.0, 30.0),
            page,
            variable,
            kind: VariableKind::Text,
            style: Some(Default::default()),
        }
    }

    fn three_page_config() -> ReportTemplateConfig {
        let mut config =
            ReportTemplateConfig::new(vec!["p1.png".into(), "p2.png".into(), "p3.png".into()]);
        config.add_zone(text_zone(1, VariablePath::ClientName)).unwrap();
        config.add_zone(text_zone(2, VariablePath::PeriodLabel)).unwrap();
        config
            .add_zone(text_zone(3, VariablePath::Kpi(
                crate::zone::MetricCategory::Calls,
                crate::template::variable::KpiField::Current,
            )))
            .unwrap();
        config
    }

    #[test]
    fn test_add_zone_rejects_missing_page() {
        let mut config = ReportTemplateConfig::new(vec!["p1.png".into()]);
        assert!(config.add_zone(text_zone(2, VariablePath::ClientName)).is_err());
        assert!(config.zones.is_empty());
    }

    #[test]
    fn test_add_zone_rejects_zero_area() {
        let mut config = ReportTemplateConfig::new(vec!["p1.png".into()]);
        let mut zone = text_zone(1, VariablePath::ClientName);
        zone.zone.width = 0.0;
        assert!(config.add_zone(zone).is_err());
    }

    #[test]
    fn test_add_zone_rejects_kind_mismatch() {
        let mut config = ReportTemplateConfig::new(vec!["p1.png".into()]);
        // Logo is an image variable; a text zone for it is inconsistent
        let zone = text_zone(1, VariablePath::ClientLogo);
        assert!(config.add_zone(zone).is_err());
    }

    #[test]
    fn test_remove_page_cascades_and_reindexes() {
        let mut config = three_page_config();
        config.remove_page(2).unwrap();

        assert_eq!(config.pages, vec!["p1.png", "p3.png"]);
        // Page 2's zone is gone, page 3's zone now targets page 2
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.zones[0].page, 1);
        assert_eq!(config.zones[1].page, 2);
        assert_eq!(config.zones_for_page(2).count(), 1);
    }

    #[test]
    fn test_move_page_carries_zones_along() {
        let mut config = three_page_config();
        config.move_page(1, 3).unwrap();

        assert_eq!(config.pages, vec!["p2.png", "p3.png", "p1.png"]);
        let client_name_zone = config
            .zones
            .iter()
            .find(|z| z.variable == VariablePath::ClientName)
            .unwrap();
        assert_eq!(client_name_zone.page, 3);
        assert_eq!(
            config
                .zones
                .iter()
                .find(|z| z.variable == VariablePath::PeriodLabel)
                .unwrap()
                .page,
            1
        );
    }

    #[test]
    fn test_replace_page_zones_is_wholesale() {
        let mut config = three_page_config();
        config.add_zone(text_zone(2, VariablePath::ClientName)).unwrap();
        assert_eq!(config.zones_for_page(2).count(), 2);

        config
            .replace_page_zones(2, vec![text_zone(2, VariablePath::ClientName)])
            .unwrap();
        assert_eq!(config.zones_for_page(2).count(), 1);
        // Other pages untouched
        assert_eq!(config.zones_for_page(1).count(), 1);
        assert_eq!(config.zones_for_page(3).count(), 1);
    }

    #[test]
    fn test_replace_page_zones_rejects_wrong_page() {
        let mut config = three_page_config();
        let result = config.replace_page_zones(2, vec![text_zone(1, VariablePath::ClientName)]);
        assert!(result.is_err());
        // Rejected save leaves the config unchanged
        assert_eq!(config, three_page_config());
    }

    #[test]
    fn test_page_out_of_range_errors() {
        let mut config = three_page_config();
        assert!(config.remove_page(0).is_err());
        assert!(config.remove_page(4).is_err());
        assert!(config.replace_page(9, "x.png").is_err());
    }
}
