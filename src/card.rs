use crate::data::filter::{has_property, PROPERTY_COLUMNS};
use crate::data::loader::{IMPLEMENTATION_AVAILABLE, IMPLEMENTATION_LINK};
use crate::data::model::{CellValue, MethodCatalog, MethodRecord};
use crate::sankey::family::MethodFamily;
use crate::sankey::taxonomy::ColumnNames;

const COMMUNITY_ICONS: [(&str, &str); 8] = [
    ("Engineering", "⚙️"),
    ("Biology", "🧬"),
    ("Social Science", "👥"),
    ("Statistics", "📊"),
    ("Artificial Intelligence", "🤖"),
    ("Healthcare", "🩺"),
    ("Computer Science", "💻"),
    ("Mathematics", "🔢"),
];
const OTHER_ICON: &str = "📋";

// ---------------------------------------------------------------------------
// Render context
// ---------------------------------------------------------------------------

/// Where a card is being drawn. Passed explicitly to the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// The card sits under a family heading, so its family line is redundant.
    pub in_family_group: bool,
}

// ---------------------------------------------------------------------------
// Field formatting
// ---------------------------------------------------------------------------

/// Publication year without decimals, `N/A` when missing.
pub fn format_year(value: &CellValue) -> String {
    match value {
        CellValue::Null => "N/A".to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(f) => format!("{f:.0}"),
        CellValue::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => format!("{f:.0}"),
            Err(_) => s.clone(),
        },
        other => other.to_string(),
    }
}

/// Dependency order in the notation of the review: `$k$`, `$\infty$` or `User`.
pub fn format_dependency_order(value: &CellValue) -> String {
    match value {
        CellValue::Null => "N/A".to_string(),
        CellValue::Integer(i) => format!("${i}$"),
        CellValue::Float(f) if f.fract() == 0.0 => format!("${}$", *f as i64),
        CellValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            format!("${s}$")
        }
        CellValue::String(s) if s == "All" => "$\\infty$".to_string(),
        CellValue::String(s) if s == "Fixed" => "User".to_string(),
        other => other.to_string(),
    }
}

/// Icon of the first community keyword found in the text.
pub fn community_icon(community: &str) -> &'static str {
    COMMUNITY_ICONS
        .iter()
        .find(|(key, _)| community.contains(key))
        .map(|(_, icon)| *icon)
        .unwrap_or(OTHER_ICON)
}

// ---------------------------------------------------------------------------
// MethodCard
// ---------------------------------------------------------------------------

/// Where the implementation of a method can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Implementation {
    Link(String),
    NotPublic,
    Unknown,
}

/// Display strings for one method, ready for any front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCard {
    pub title: String,
    pub icon: &'static str,
    pub year: String,
    pub community: String,
    pub subfamily: String,
    pub main_algorithm: String,
    pub dependency_order: String,
    /// `Yes` properties joined with `, `, or `None`.
    pub key_properties: String,
    pub data_type: Option<String>,
    pub original_article: String,
    pub published_in: String,
    /// Omitted inside a family group.
    pub family: Option<String>,
    pub applied_in: String,
    pub article_link: Option<String>,
    pub implementation: Implementation,
}

impl MethodCard {
    pub fn from_record(
        record: &MethodRecord,
        index: usize,
        columns: &ColumnNames,
        ctx: RenderContext,
    ) -> Self {
        let or = |col: &str, default: &str| record.text(col).unwrap_or_else(|| default.to_string());

        let title = record
            .text("Method Name")
            .or_else(|| record.text("Original Article"))
            .unwrap_or_else(|| format!("Method {index}"));
        let community = or(&columns.community, "Other");

        let properties: Vec<&str> = PROPERTY_COLUMNS
            .iter()
            .copied()
            .filter(|p| has_property(record, p))
            .collect();
        let key_properties = if properties.is_empty() {
            "None".to_string()
        } else {
            properties.join(", ")
        };

        let implementation = match record.text(IMPLEMENTATION_LINK) {
            Some(link) => Implementation::Link(link),
            None if record.text(IMPLEMENTATION_AVAILABLE).as_deref() == Some("No") => {
                Implementation::NotPublic
            }
            None => Implementation::Unknown,
        };

        MethodCard {
            icon: community_icon(&community),
            title,
            year: format_year(record.get("Year")),
            community,
            subfamily: or(&columns.subfamily, "None"),
            main_algorithm: or("Main Algorithm (standardized)", "None"),
            dependency_order: format_dependency_order(record.get("Dependency order")),
            key_properties,
            data_type: record.text(&columns.data_type),
            original_article: or("Original Article", "N/A"),
            published_in: or("Publication name", "N/A"),
            family: if ctx.in_family_group {
                None
            } else {
                record.text(&columns.family)
            },
            applied_in: or("Article found", "N/A"),
            article_link: record.text("Link"),
            implementation,
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Heading a group of cards sits under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FamilyGroup {
    Family(MethodFamily),
    Other,
}

impl FamilyGroup {
    pub fn label(self) -> &'static str {
        match self {
            FamilyGroup::Family(f) => f.label(),
            FamilyGroup::Other => "Other",
        }
    }
}

/// Group visible record indices by method family: canonical families first,
/// then `Other` for anything unrecognised. Empty groups are left out.
pub fn group_by_family(
    catalog: &MethodCatalog,
    indices: &[usize],
    columns: &ColumnNames,
) -> Vec<(FamilyGroup, Vec<usize>)> {
    let mut groups: Vec<(FamilyGroup, Vec<usize>)> = MethodFamily::CANONICAL
        .into_iter()
        .map(FamilyGroup::Family)
        .chain([FamilyGroup::Other])
        .map(|g| (g, Vec::new()))
        .collect();

    for &i in indices {
        let Some(rec) = catalog.records.get(i) else {
            continue;
        };
        let group = rec
            .get(&columns.family)
            .as_str()
            .and_then(MethodFamily::from_label)
            .map(FamilyGroup::Family)
            .unwrap_or(FamilyGroup::Other);
        if let Some((_, members)) = groups.iter_mut().find(|(g, _)| *g == group) {
            members.push(i);
        }
    }

    groups.retain(|(_, members)| !members.is_empty());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_printed_without_decimals() {
        assert_eq!(format_year(&CellValue::Float(2019.0)), "2019");
        assert_eq!(format_year(&CellValue::Integer(2004)), "2004");
        assert_eq!(format_year(&CellValue::Null), "N/A");
        assert_eq!(format_year(&CellValue::from("circa")), "circa");
    }

    #[test]
    fn dependency_order_notation() {
        assert_eq!(format_dependency_order(&CellValue::Integer(2)), "$2$");
        assert_eq!(format_dependency_order(&CellValue::Float(3.0)), "$3$");
        assert_eq!(format_dependency_order(&CellValue::from("All")), "$\\infty$");
        assert_eq!(format_dependency_order(&CellValue::from("Fixed")), "User");
        assert_eq!(format_dependency_order(&CellValue::from("Variable")), "Variable");
        assert_eq!(format_dependency_order(&CellValue::Null), "N/A");
    }

    #[test]
    fn icon_follows_first_keyword() {
        assert_eq!(community_icon("Social Science; Statistics"), "👥");
        assert_eq!(community_icon("Healthcare"), "🩺");
        assert_eq!(community_icon("Linguistics"), OTHER_ICON);
    }

    #[test]
    fn card_defaults_and_family_suppression() {
        let cols = ColumnNames::default();
        let rec = MethodRecord::new()
            .with("Original Article", "Studer et al. (2011)")
            .with(&cols.family, "Distance-based")
            .with("Covariates", "Yes")
            .with("Multivariate", "Yes")
            .with(IMPLEMENTATION_AVAILABLE, "No");

        let card = MethodCard::from_record(&rec, 7, &cols, RenderContext::default());
        assert_eq!(card.title, "Studer et al. (2011)");
        assert_eq!(card.community, "Other");
        assert_eq!(card.icon, OTHER_ICON);
        assert_eq!(card.subfamily, "None");
        assert_eq!(card.key_properties, "Covariates, Multivariate");
        assert_eq!(card.family.as_deref(), Some("Distance-based"));
        assert_eq!(card.implementation, Implementation::NotPublic);

        let grouped = MethodCard::from_record(
            &rec,
            7,
            &cols,
            RenderContext {
                in_family_group: true,
            },
        );
        assert_eq!(grouped.family, None);

        let anonymous = MethodCard::from_record(&MethodRecord::new(), 3, &cols, RenderContext::default());
        assert_eq!(anonymous.title, "Method 3");
        assert_eq!(anonymous.implementation, Implementation::Unknown);
    }

    #[test]
    fn groups_follow_canonical_order_with_other_last() {
        let cols = ColumnNames::default();
        let catalog = MethodCatalog::from_records(
            vec![cols.family.clone()],
            vec![
                MethodRecord::new().with(&cols.family, "Feature-based"),
                MethodRecord::new().with(&cols.family, "Hybrid"),
                MethodRecord::new().with(&cols.family, "Model-based"),
                MethodRecord::new().with(&cols.family, "Feature-based"),
            ],
        );
        let groups = group_by_family(&catalog, &[0, 1, 2, 3], &cols);
        assert_eq!(
            groups,
            vec![
                (FamilyGroup::Family(MethodFamily::ModelBased), vec![2]),
                (FamilyGroup::Family(MethodFamily::FeatureBased), vec![0, 3]),
                (FamilyGroup::Other, vec![1]),
            ]
        );
    }
}
