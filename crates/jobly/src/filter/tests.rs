use super::*;
use crate::fragment::placeholder_count;

#[test]
fn company_filter_all_present() {
    let criteria = FilterCriteria::new()
        .set("minEmployees", 2)
        .set("maxEmployees", 3)
        .set("nameLike", "c");
    let filter = sql_for_filtering_companies(&criteria).unwrap();

    assert_eq!(
        filter.fragment(),
        r#""num_employees" >= $1 AND "num_employees" <= $2 AND "name" ILIKE $3"#
    );
    assert_eq!(
        filter.values(),
        &[SqlValue::Int(2), SqlValue::Int(3), SqlValue::from("%c%")]
    );
}

#[test]
fn company_filter_skipped_bound_does_not_leave_gap() {
    let criteria = FilterCriteria::new()
        .set("maxEmployees", 10)
        .set("nameLike", "net");
    let filter = sql_for_filtering_companies(&criteria).unwrap();

    assert_eq!(
        filter.fragment(),
        r#""num_employees" <= $1 AND "name" ILIKE $2"#
    );
    assert_eq!(filter.values(), &[SqlValue::Int(10), SqlValue::from("%net%")]);
}

#[test]
fn company_filter_coerces_query_string_numbers() {
    let criteria = FilterCriteria::new()
        .set("minEmployees", "100")
        .set("maxEmployees", "250.5");
    let filter = sql_for_filtering_companies(&criteria).unwrap();
    assert_eq!(filter.values(), &[SqlValue::Int(100), SqlValue::Float(250.5)]);
}

#[test]
fn company_filter_rejects_non_numeric_bound() {
    let criteria = FilterCriteria::new().set("minEmployees", "lots");
    let err = sql_for_filtering_companies(&criteria).unwrap_err();
    assert!(matches!(
        err,
        JoblyError::InvalidFilterValue {
            filter: "minEmployees",
            ..
        }
    ));
}

#[test]
fn clause_order_follows_declaration_not_input() {
    let criteria = FilterCriteria::new()
        .set("nameLike", "c")
        .set("maxEmployees", 3)
        .set("minEmployees", 2);
    let filter = sql_for_filtering_companies(&criteria).unwrap();
    assert_eq!(
        filter.fragment(),
        r#""num_employees" >= $1 AND "num_employees" <= $2 AND "name" ILIKE $3"#
    );
}

#[test]
fn unrecognized_key_fails() {
    let criteria = FilterCriteria::new().set("nameLike", "x").set("bogusKey", 1);
    let err = sql_for_filtering_companies(&criteria).unwrap_err();
    match err {
        JoblyError::UnrecognizedFilter { resource, key } => {
            assert_eq!(resource, "company");
            assert_eq!(key, "bogusKey");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn filters_are_resource_specific() {
    let criteria = FilterCriteria::new().set("title", "Engineer");
    assert!(sql_for_filtering_companies(&criteria).is_err());
    assert!(sql_for_filtering_jobs(&criteria).is_ok());
}

#[test]
fn empty_criteria_is_unconstrained() {
    for set in [&COMPANY_FILTERS, &JOB_FILTERS] {
        let filter = set.build(&FilterCriteria::new()).unwrap();
        assert_eq!(filter.fragment(), "");
        assert!(filter.values().is_empty());
        assert_eq!(filter.where_clause(), "");
    }
}

#[test]
fn job_gate_consumes_no_placeholder() {
    let criteria = FilterCriteria::new()
        .set("hasEquity", true)
        .set("title", "Engineer");
    let filter = sql_for_filtering_jobs(&criteria).unwrap();

    assert_eq!(filter.fragment(), "equity > 0 AND title ILIKE $1");
    assert_eq!(filter.values(), &[SqlValue::from("%Engineer%")]);
}

#[test]
fn job_filter_all_present() {
    let criteria = FilterCriteria::new()
        .set("title", "dev")
        .set("minSalary", 50_000)
        .set("hasEquity", "true");
    let filter = sql_for_filtering_jobs(&criteria).unwrap();

    assert_eq!(
        filter.fragment(),
        "salary >= $1 AND equity > 0 AND title ILIKE $2"
    );
    assert_eq!(filter.values(), &[SqlValue::Int(50_000), SqlValue::from("%dev%")]);
}

#[test]
fn job_min_salary_passes_through_unconverted() {
    let criteria = FilterCriteria::new().set("minSalary", "50000");
    let filter = sql_for_filtering_jobs(&criteria).unwrap();
    assert_eq!(filter.fragment(), "salary >= $1");
    assert_eq!(filter.values(), &[SqlValue::from("50000")]);
}

#[test]
fn falsy_gate_is_omitted() {
    let criteria = FilterCriteria::new()
        .set("hasEquity", false)
        .set("minSalary", 1);
    let filter = sql_for_filtering_jobs(&criteria).unwrap();
    assert_eq!(filter.fragment(), "salary >= $1");

    let only_gate = FilterCriteria::new().set("hasEquity", "false");
    let filter = sql_for_filtering_jobs(&only_gate).unwrap();
    assert!(filter.is_empty());
}

#[test]
fn null_or_unrecognized_gate_is_omitted() {
    for gate in [SqlValue::Null, SqlValue::from("yes"), SqlValue::from("sometimes")] {
        let criteria = FilterCriteria::new()
            .set("hasEquity", gate.clone())
            .set("title", "x");
        let filter = sql_for_filtering_jobs(&criteria)
            .unwrap_or_else(|e| panic!("hasEquity = {gate:?} failed: {e}"));
        assert_eq!(filter.fragment(), "title ILIKE $1");
        assert_eq!(filter.values(), &[SqlValue::from("%x%")]);
    }

    let only_gate = FilterCriteria::new().set("hasEquity", SqlValue::Null);
    let filter = sql_for_filtering_jobs(&only_gate).unwrap();
    assert!(filter.is_empty());
    assert_eq!(filter.where_clause(), "");
}

#[test]
fn gate_from_json_null_is_omitted() {
    let criteria: FilterCriteria =
        serde_json::from_str(r#"{"hasEquity": null, "minSalary": 10}"#).unwrap();
    let filter = sql_for_filtering_jobs(&criteria).unwrap();
    assert_eq!(filter.fragment(), "salary >= $1");
    assert_eq!(filter.values(), &[SqlValue::Int(10)]);
}

#[test]
fn contains_rejects_non_text() {
    let criteria = FilterCriteria::new().set("title", true);
    assert!(sql_for_filtering_jobs(&criteria).is_err());
}

fn assert_every_subset_numbers_cleanly(set: &FilterSet, all: &[(&str, SqlValue)]) {
    for mask in 0u32..(1 << all.len()) {
        let criteria: FilterCriteria = all
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1u32 << *i) != 0)
            .map(|(_, (k, v))| (*k, v.clone()))
            .collect();
        let emitting = criteria
            .keys()
            .filter(|k| set.field(k).is_some_and(FilterField::emits_value))
            .count();

        let filter = set.build(&criteria).unwrap();
        assert_eq!(placeholder_count(filter.fragment()), filter.values().len());
        assert_eq!(filter.values().len(), emitting);
        assert!(!filter.fragment().starts_with(" AND"));
        assert!(!filter.fragment().ends_with("AND "));
        for i in 1..=filter.values().len() {
            assert!(
                filter.fragment().contains(&format!("${i}")),
                "{} mask {mask:#b}: missing ${i} in {}",
                set.resource,
                filter.fragment()
            );
        }
        assert!(!filter
            .fragment()
            .contains(&format!("${}", filter.values().len() + 1)));
    }
}

#[test]
fn job_placeholders_match_values_for_every_subset() {
    assert_every_subset_numbers_cleanly(
        &JOB_FILTERS,
        &[
            ("minSalary", SqlValue::Int(10)),
            ("hasEquity", SqlValue::Bool(true)),
            ("title", SqlValue::from("eng")),
        ],
    );
}

#[test]
fn company_placeholders_match_values_for_every_subset() {
    assert_every_subset_numbers_cleanly(
        &COMPANY_FILTERS,
        &[
            ("minEmployees", SqlValue::Int(2)),
            ("maxEmployees", SqlValue::from("300")),
            ("nameLike", SqlValue::from("net")),
        ],
    );
}

#[test]
fn build_is_idempotent() {
    let criteria = FilterCriteria::new()
        .set("minEmployees", 5)
        .set("nameLike", "and");
    let a = sql_for_filtering_companies(&criteria).unwrap();
    let b = sql_for_filtering_companies(&criteria).unwrap();
    assert_eq!(a, b);
}

#[test]
fn declared_tables_have_unique_names() {
    for set in [&COMPANY_FILTERS, &JOB_FILTERS] {
        for (i, field) in set.fields.iter().enumerate() {
            assert!(
                set.fields[i + 1..].iter().all(|f| f.name != field.name),
                "duplicate filter {} in {}",
                field.name,
                set.resource
            );
        }
    }
}
