use serde::Serialize;

/// Flat category every block in a ballot exercise is sold under.
pub const FLAT_CATEGORY: &str = "BTO";

/// Town-level values the upstream form expects on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TownProfile<'a> {
    pub town: &'a str,
    pub neighbourhood: &'a str,
}

/// Query string for one (block, flat type) availability lookup.
///
/// The field set is the complete upstream contract. Several fields carry
/// sentinel values the service requires verbatim regardless of meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatQuery<'a> {
    #[serde(rename = "Flat")]
    flat: &'a str,
    #[serde(rename = "Block")]
    block: &'a str,
    #[serde(rename = "Contract")]
    contract: &'a str,
    #[serde(rename = "Town")]
    town: &'a str,
    #[serde(rename = "Flat_Type")]
    flat_category: &'static str,
    ethnic: &'static str,
    #[serde(rename = "ViewOption")]
    view_option: &'static str,
    #[serde(rename = "projName")]
    project_name: &'static str,
    #[serde(rename = "DesType")]
    des_type: &'static str,
    #[serde(rename = "EthnicA")]
    ethnic_a: &'static str,
    #[serde(rename = "EthnicM")]
    ethnic_m: &'static str,
    #[serde(rename = "EthnicC")]
    ethnic_c: &'static str,
    #[serde(rename = "EthnicO")]
    ethnic_o: &'static str,
    #[serde(rename = "numSPR")]
    num_spr: &'static str,
    #[serde(rename = "dteBallot")]
    ballot_date: &'a str,
    #[serde(rename = "Neighbourhood")]
    neighbourhood: &'a str,
    #[serde(rename = "BonusFlats1")]
    bonus_flats: &'static str,
    #[serde(rename = "searchDetails")]
    search_details: &'static str,
    #[serde(rename = "isTownChange")]
    is_town_change: &'static str,
    brochure: &'static str,
}

impl<'a> FlatQuery<'a> {
    pub fn new(
        block: &'a str,
        flat_type: &'a str,
        contract: &'a str,
        ballot_date: &'a str,
        town: TownProfile<'a>,
    ) -> Self {
        Self {
            flat: flat_type,
            block,
            contract,
            town: town.town,
            flat_category: FLAT_CATEGORY,
            ethnic: "Y",
            view_option: "A",
            project_name: "A",
            des_type: "A",
            ethnic_a: "Y",
            ethnic_m: "",
            ethnic_c: "",
            ethnic_o: "",
            num_spr: "",
            ballot_date,
            neighbourhood: town.neighbourhood,
            bonus_flats: "N",
            search_details: "",
            is_town_change: "No",
            brochure: "false",
        }
    }

    pub fn block(&self) -> &'a str {
        self.block
    }

    pub fn flat_type(&self) -> &'a str {
        self.flat
    }

    /// Key/value pairs in wire order.
    pub fn pairs(&self) -> Vec<(&'static str, &'a str)> {
        vec![
            ("Flat", self.flat),
            ("Block", self.block),
            ("Contract", self.contract),
            ("Town", self.town),
            ("Flat_Type", self.flat_category),
            ("ethnic", self.ethnic),
            ("ViewOption", self.view_option),
            ("projName", self.project_name),
            ("DesType", self.des_type),
            ("EthnicA", self.ethnic_a),
            ("EthnicM", self.ethnic_m),
            ("EthnicC", self.ethnic_c),
            ("EthnicO", self.ethnic_o),
            ("numSPR", self.num_spr),
            ("dteBallot", self.ballot_date),
            ("Neighbourhood", self.neighbourhood),
            ("BonusFlats1", self.bonus_flats),
            ("searchDetails", self.search_details),
            ("isTownChange", self.is_town_change),
            ("brochure", self.brochure),
        ]
    }
}

/// Query for the first request of a session, which only sets cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionQuery {
    #[serde(rename = "Town")]
    town: String,
    #[serde(rename = "Flat_Type")]
    flat_category: &'static str,
    #[serde(rename = "DesType")]
    des_type: &'static str,
    ethnic: &'static str,
    #[serde(rename = "Flat")]
    flat: String,
    #[serde(rename = "ViewOption")]
    view_option: &'static str,
    #[serde(rename = "dteBallot")]
    ballot_date: String,
    #[serde(rename = "projName")]
    project_name: &'static str,
    brochure: &'static str,
}

impl SessionQuery {
    pub fn new(town: &str, flat_type: &str, ballot_date: &str) -> Self {
        Self {
            town: town.to_string(),
            flat_category: FLAT_CATEGORY,
            des_type: "A",
            ethnic: "Y",
            flat: flat_type.to_string(),
            view_option: "A",
            ballot_date: ballot_date.to_string(),
            project_name: "A",
            brochure: "false",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const TOA_PAYOH: TownProfile<'static> = TownProfile {
        town: "Toa Payoh",
        neighbourhood: "N9",
    };

    #[test]
    fn query_carries_cohort_and_sentinel_values() {
        let query = FlatQuery::new("107A", "4-Room", "C7", "201602", TOA_PAYOH);
        let pairs = query.pairs();

        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| *value)
                .unwrap_or_else(|| panic!("missing {key}"))
        };

        assert_eq!(lookup("Flat"), "4-Room");
        assert_eq!(lookup("Block"), "107A");
        assert_eq!(lookup("Contract"), "C7");
        assert_eq!(lookup("Town"), "Toa Payoh");
        assert_eq!(lookup("Flat_Type"), "BTO");
        assert_eq!(lookup("dteBallot"), "201602");
        assert_eq!(lookup("Neighbourhood"), "N9");
        assert_eq!(lookup("BonusFlats1"), "N");
        assert_eq!(lookup("isTownChange"), "No");
        assert_eq!(lookup("brochure"), "false");
        assert_eq!(lookup("EthnicM"), "");
    }

    #[test]
    fn serialized_keys_match_wire_pairs() {
        let query = FlatQuery::new("111A", "3-Room", "C6", "201602", TOA_PAYOH);
        let value = serde_json::to_value(&query).expect("serializes");
        let object = value.as_object().expect("object");

        let pairs = query.pairs();
        assert_eq!(object.len(), 20);
        assert_eq!(pairs.len(), 20);
        for (key, expected) in pairs {
            assert_eq!(object.get(key), Some(&Value::from(expected)), "key {key}");
        }
    }

    #[test]
    fn same_inputs_build_identical_queries() {
        let first = FlatQuery::new("107A", "4-Room", "C7", "201602", TOA_PAYOH);
        let second = FlatQuery::new("107A", "4-Room", "C7", "201602", TOA_PAYOH);
        assert_eq!(first, second);
        assert_eq!(first.block(), "107A");
        assert_eq!(first.flat_type(), "4-Room");
    }

    #[test]
    fn session_query_uses_bootstrap_defaults() {
        let query = SessionQuery::new("Toa Payoh", "4-Room", "201602");
        let value = serde_json::to_value(&query).expect("serializes");
        assert_eq!(value["Town"], "Toa Payoh");
        assert_eq!(value["Flat"], "4-Room");
        assert_eq!(value["Flat_Type"], "BTO");
        assert_eq!(value["dteBallot"], "201602");
        assert_eq!(value["brochure"], "false");
    }
}
