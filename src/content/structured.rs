//! JSON-LD structured data for search engines

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::draft::Draft;

const SCHEMA_CONTEXT: &str = "https://schema.org";

impl Draft {
    /// `Article`, then `FAQPage` when the draft has complete FAQ entries
    pub fn to_structured_data(&self, author: &str, publish_date: NaiveDate) -> Vec<Value> {
        let mut schema = vec![json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Article",
            "headline": self.title,
            "description": self.description,
            "author": { "@type": "Person", "name": author },
            "datePublished": publish_date.format("%Y-%m-%d").to_string(),
        })];

        let faqs = self.valid_faqs();
        if !faqs.is_empty() {
            let questions: Vec<Value> = faqs
                .iter()
                .map(|f| {
                    json!({
                        "@type": "Question",
                        "name": f.question,
                        "acceptedAnswer": { "@type": "Answer", "text": f.answer },
                    })
                })
                .collect();
            schema.push(json!({
                "@context": SCHEMA_CONTEXT,
                "@type": "FAQPage",
                "mainEntity": questions,
            }));
        }

        schema
    }

    /// Pretty-printed structured data, ready to paste into a page head
    pub fn structured_data_json(&self, author: &str, publish_date: NaiveDate) -> String {
        let schema = Value::Array(self.to_structured_data(author, publish_date));
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "[]".to_string())
    }
}
