//! Rule-based result retrieval.
//!
//! A relationship's rules select suites and cases of its two member products.
//! Selection runs in memory over one candidate fetch; only the survivors get
//! their properties loaded and their result rows re-read.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{ResultsGateway, SuiteWithCases};
use crate::error::{AppError, AppResult};
use crate::models::{PropertyView, ResultView, Rule, RuleScope, TestCaseView, TestSuiteView};

use super::matcher::matches_expression;

/// What the rules picked from one candidate suite.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct SuiteSelection {
    /// Selected by name at suite level: every case is kept
    whole: bool,
    /// Cases selected by name at case level
    cases: BTreeSet<Uuid>,
}

/// Apply every rule to the candidates and keep what at least one rule selected.
///
/// A suite matched at suite level by any rule keeps all its cases. Otherwise it
/// keeps the union of the cases matched at case level. Suites nothing matched
/// are dropped. Output keeps candidate order (suites and cases by id).
pub fn select_suites(rules: &[Rule], candidates: Vec<SuiteWithCases>) -> Vec<SuiteWithCases> {
    let mut selections: BTreeMap<Uuid, SuiteSelection> = BTreeMap::new();

    for rule in rules {
        let by_suite = rule.scopes.contains(RuleScope::Suite);
        let by_case = rule.scopes.contains(RuleScope::Case);

        for (suite, cases) in &candidates {
            if by_suite && matches_expression(&suite.name, &rule.expression) {
                selections.entry(suite.id).or_default().whole = true;
            }

            if by_case {
                for case in cases {
                    if matches_expression(&case.name, &rule.expression) {
                        selections.entry(suite.id).or_default().cases.insert(case.id);
                    }
                }
            }
        }
    }

    candidates
        .into_iter()
        .filter_map(|(suite, cases)| {
            let selection = selections.remove(&suite.id)?;
            let cases = if selection.whole {
                cases
            } else {
                cases
                    .into_iter()
                    .filter(|case| selection.cases.contains(&case.id))
                    .collect()
            };
            Some((suite, cases))
        })
        .collect()
}

/// Results of the relationship's member products selected by its rules.
///
/// Unknown relationship is `NotFound`; no rules or no matches give an empty list.
/// A selected result removed while the request runs is left out.
pub async fn retrieve_by_relationship<G>(gateway: &G, relationship_id: Uuid) -> AppResult<Vec<ResultView>>
where
    G: ResultsGateway + ?Sized,
{
    let relationship = gateway.find_relationship(relationship_id).await?;

    let rules: Vec<Rule> = gateway
        .find_rules_by_relationship(relationship_id)
        .await?
        .iter()
        .map(Rule::from)
        .collect();

    if rules.is_empty() {
        info!(relationship_id = %relationship_id, "Relationship has no rules");
        return Ok(Vec::new());
    }

    let candidates = gateway
        .query_suites_with_cases(&relationship.members())
        .await?;
    let candidate_count = candidates.len();

    let selected = select_suites(&rules, candidates);

    info!(
        relationship_id = %relationship_id,
        rules = rules.len(),
        candidates = candidate_count,
        selected = selected.len(),
        "Evaluated relationship rules"
    );

    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_result: BTreeMap<Uuid, Vec<TestSuiteView>> = BTreeMap::new();
    for suite in with_properties(gateway, selected).await? {
        by_result.entry(suite.result_id).or_default().push(suite);
    }

    let mut views = Vec::with_capacity(by_result.len());
    for (result_id, suites) in by_result {
        match gateway.find_result(result_id).await {
            Ok(result) => views.push(ResultView::new(result, suites)),
            // Deleted with its product since the candidate fetch
            Err(AppError::NotFound(_)) => {
                warn!(
                    relationship_id = %relationship_id,
                    result_id = %result_id,
                    "Selected result vanished, skipping"
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(views)
}

/// Every result of one product with its full suite/case/property tree.
pub async fn retrieve_by_product<G>(gateway: &G, product_id: Uuid) -> AppResult<Vec<ResultView>>
where
    G: ResultsGateway + ?Sized,
{
    gateway.find_product(product_id).await?;

    let results = gateway.query_results_by_product(product_id).await?;
    let result_ids: Vec<Uuid> = results.iter().map(|r| r.id).collect();
    let suites = gateway.query_suites_by_results(&result_ids).await?;

    let mut by_result: BTreeMap<Uuid, Vec<TestSuiteView>> = BTreeMap::new();
    for suite in with_properties(gateway, suites).await? {
        by_result.entry(suite.result_id).or_default().push(suite);
    }

    debug!(
        product_id = %product_id,
        results = results.len(),
        "Loaded product results"
    );

    Ok(results
        .into_iter()
        .map(|result| {
            let suites = by_result.remove(&result.id).unwrap_or_default();
            ResultView::new(result, suites)
        })
        .collect())
}

/// Load the properties of the given suites and cases and build their views.
async fn with_properties<G>(gateway: &G, suites: Vec<SuiteWithCases>) -> AppResult<Vec<TestSuiteView>>
where
    G: ResultsGateway + ?Sized,
{
    let suite_ids: Vec<Uuid> = suites.iter().map(|(suite, _)| suite.id).collect();
    let case_ids: Vec<Uuid> = suites
        .iter()
        .flat_map(|(_, cases)| cases.iter().map(|case| case.id))
        .collect();

    let mut suite_properties: BTreeMap<Uuid, Vec<PropertyView>> = BTreeMap::new();
    let mut case_properties: BTreeMap<Uuid, Vec<PropertyView>> = BTreeMap::new();
    for property in gateway.query_properties(&suite_ids, &case_ids).await? {
        match (property.test_suite_id, property.test_case_id) {
            (Some(owner), _) => suite_properties.entry(owner).or_default().push(property.into()),
            (None, Some(owner)) => case_properties.entry(owner).or_default().push(property.into()),
            (None, None) => {}
        }
    }

    Ok(suites
        .into_iter()
        .map(|(suite, cases)| {
            let cases = cases
                .into_iter()
                .map(|case| {
                    let properties = case_properties.remove(&case.id).unwrap_or_default();
                    TestCaseView::new(case, properties)
                })
                .collect();
            let properties = suite_properties.remove(&suite.id).unwrap_or_default();
            TestSuiteView::new(suite, properties, cases)
        })
        .collect())
}
