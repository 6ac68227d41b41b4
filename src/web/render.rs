// src/web/render.rs
//! Server-side HTML for the form and result pages.

use crate::error::{ConfigurationError, InferenceError};
use crate::models::{
    A1cResult, AdmissionType, AgeBracket, Gender, GlucoseSerumResult, InsulinUsage,
    PredictionResult, RawInput, RiskLevel,
};
use crate::models::patient::{
    NUM_DIAGNOSES_RANGE, NUM_LAB_PROCEDURES_RANGE, NUM_MEDICATIONS_RANGE, NUM_PROCEDURES_RANGE,
    TIME_IN_HOSPITAL_RANGE,
};
use std::ops::RangeInclusive;

const TITLE: &str = "Diyabet Hastalarının Yeniden Yatış Tahmini";
const INTRO: &str =
    "Bu uygulama diyabet hastalarının hastaneye 30 gün içinde yeniden yatış ihtimalini tahmin eder.";

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2rem auto;padding:0 1rem;color:#222}\
.columns{display:flex;gap:2rem;flex-wrap:wrap}.columns>div{flex:1;min-width:280px}\
label{display:block;margin-top:.8rem;font-weight:600}select,input{width:100%;padding:.3rem}\
button{margin-top:1.2rem;padding:.6rem 1.4rem;font-size:1rem}\
.error{background:#fde2e1;border:1px solid #e0a3a0;padding:.8rem 1rem}\
.success{background:#e3f6e5;border:1px solid #9fd3a6;padding:.8rem 1rem}\
.warning{background:#fff4d6;border:1px solid #e6c66e;padding:.8rem 1rem}\
pre{white-space:pre-wrap;background:#f5f5f5;padding:.8rem;font-size:.85rem}";

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"tr\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n<p>{intro}</p>\n{body}\n</body>\n</html>\n",
        title = TITLE,
        style = STYLE,
        intro = INTRO,
        body = body
    )
}

fn select(name: &str, label: &str, options: &[(String, String)], selected: &str) -> String {
    let mut html = format!(
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n",
        name = name,
        label = escape_html(label)
    );
    for (value, text) in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(value),
            if value == selected { " selected" } else { "" },
            escape_html(text)
        ));
    }
    html.push_str("</select>\n");
    html
}

fn number(name: &str, label: &str, range: &RangeInclusive<u32>, value: u32) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" value=\"{value}\" required>\n",
        name = name,
        label = escape_html(label),
        min = range.start(),
        max = range.end(),
        value = value
    )
}

fn yes_no(name: &str, label: &str, value: bool) -> String {
    let options = [
        ("false".to_string(), "Hayır".to_string()),
        ("true".to_string(), "Evet".to_string()),
    ];
    select(name, label, &options, if value { "true" } else { "false" })
}

fn problem_list(problems: &[String]) -> String {
    if problems.is_empty() {
        return String::new();
    }
    let mut html = String::from("<div class=\"error\"><strong>Form hatalı:</strong>\n<ul>\n");
    for problem in problems {
        html.push_str(&format!("<li>{}</li>\n", escape_html(problem)));
    }
    html.push_str("</ul></div>\n");
    html
}

fn form(input: &RawInput) -> String {
    let ages: Vec<(String, String)> = AgeBracket::all()
        .map(|b| (b.code().to_string(), format!("{} yaş", b.label())))
        .collect();
    let insulin: Vec<(String, String)> = InsulinUsage::ALL
        .iter()
        .map(|i| (i.as_str().to_string(), i.label().to_string()))
        .collect();
    let a1c: Vec<(String, String)> = A1cResult::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), r.label().to_string()))
        .collect();
    let glucose: Vec<(String, String)> = GlucoseSerumResult::ALL
        .iter()
        .map(|r| (r.as_str().to_string(), r.label().to_string()))
        .collect();
    let genders: Vec<(String, String)> = Gender::ALL
        .iter()
        .map(|g| (g.as_str().to_string(), g.as_str().to_string()))
        .collect();
    let admissions: Vec<(String, String)> = AdmissionType::ALL
        .iter()
        .map(|a| (a.as_str().to_string(), a.as_str().to_string()))
        .collect();

    let mut left = String::new();
    left.push_str(&select("age", "Yaş Aralığı", &ages, &input.age.code().to_string()));
    left.push_str(&number(
        "time_in_hospital",
        "Hastanede Kalma Süresi (gün)",
        &TIME_IN_HOSPITAL_RANGE,
        input.time_in_hospital,
    ));
    left.push_str(&number(
        "num_lab_procedures",
        "Laboratuvar İşlem Sayısı",
        &NUM_LAB_PROCEDURES_RANGE,
        input.num_lab_procedures,
    ));
    left.push_str(&number(
        "num_medications",
        "İlaç Sayısı",
        &NUM_MEDICATIONS_RANGE,
        input.num_medications,
    ));
    left.push_str(&number(
        "num_procedures",
        "Prosedür Sayısı",
        &NUM_PROCEDURES_RANGE,
        input.num_procedures,
    ));
    left.push_str(&number(
        "num_diagnoses",
        "Teşhis Sayısı",
        &NUM_DIAGNOSES_RANGE,
        input.num_diagnoses,
    ));
    left.push_str(&yes_no("emergency", "Acil Başvuru", input.emergency));

    let mut right = String::new();
    right.push_str(&select("insulin", "İnsülin Kullanımı", &insulin, input.insulin.as_str()));
    right.push_str(&yes_no("diabetes_med", "Diyabet İlacı Verildi mi?", input.diabetes_med));
    right.push_str(&select("a1c_result", "A1C Testi Sonucu", &a1c, input.a1c_result.as_str()));
    right.push_str(&select(
        "glucose_serum",
        "Glukoz Serum Testi Sonucu",
        &glucose,
        input.glucose_serum.as_str(),
    ));
    right.push_str(&select("gender", "Cinsiyet", &genders, input.gender.as_str()));
    right.push_str(&select(
        "admission_type",
        "Başvuru Türü",
        &admissions,
        input.admission_type.as_str(),
    ));

    format!(
        "<h2>Hasta Bilgilerini Girin</h2>\n<form method=\"post\" action=\"/predict\">\n\
         <div class=\"columns\">\n<div>\n{}</div>\n<div>\n{}</div>\n</div>\n\
         <button type=\"submit\">Tahmin Et</button>\n</form>\n",
        left, right
    )
}

pub fn form_page(input: &RawInput, problems: &[String]) -> String {
    layout(&format!("{}{}", problem_list(problems), form(input)))
}

pub fn result_page(input: &RawInput, result: &PredictionResult) -> String {
    let verdict = &result.verdict;
    let (class, headline) = match verdict.risk {
        RiskLevel::High => ("error", verdict.risk.headline()),
        RiskLevel::Low => ("success", verdict.risk.headline()),
    };

    let mut body = String::from("<h2>Tahmin Sonucu</h2>\n");
    body.push_str(&format!("<div class=\"{}\">{}</div>\n", class, escape_html(headline)));
    match verdict.risk {
        RiskLevel::High => body.push_str(&format!(
            "<p>Yeniden yatış olasılığı: {:.2}%</p>\n",
            verdict.readmission_pct
        )),
        RiskLevel::Low => body.push_str(&format!(
            "<p>Yeniden yatış olmaması olasılığı: {:.2}%</p>\n",
            verdict.no_readmission_pct
        )),
    }

    body.push_str("<h3>Model Güven Değerleri</h3>\n<ul>\n");
    body.push_str(&format!(
        "<li>Yeniden yatış YOK olasılığı: {:.2}%</li>\n",
        verdict.no_readmission_pct
    ));
    body.push_str(&format!(
        "<li>Yeniden yatış VAR olasılığı: {:.2}%</li>\n</ul>\n",
        verdict.readmission_pct
    ));

    if !verdict.triggers.is_empty() {
        body.push_str("<p><small>Yüksek risk gerekçesi: ");
        let reasons: Vec<&str> = verdict.triggers.iter().map(|t| t.description()).collect();
        body.push_str(&escape_html(&reasons.join("; ")));
        body.push_str("</small></p>\n");
    }

    body.push_str("<h3>Risk Faktörleri</h3>\n");
    if result.risk_factors.is_empty() {
        body.push_str("<p>Belirgin bir risk faktörü tespit edilmedi.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for factor in &result.risk_factors {
            body.push_str(&format!("<li>{}</li>\n", escape_html(factor.label())));
        }
        body.push_str("</ul>\n");
    }

    body.push_str(&format!(
        "<h3>{}</h3>\n<ul>\n",
        escape_html(result.recommendations.title)
    ));
    for item in result.recommendations.items {
        body.push_str(&format!("<li>{}</li>\n", escape_html(item)));
    }
    body.push_str("</ul>\n");

    body.push_str(&format!(
        "<p><small>Tahmin no: {} · {}</small></p>\n<hr>\n",
        result.prediction_id,
        result.predicted_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    body.push_str(&form(input));
    layout(&body)
}

pub fn inference_error_page(input: &RawInput, error: &InferenceError) -> String {
    let body = format!(
        "<div class=\"error\"><strong>Tahmin sırasında hata oluştu.</strong> \
         Girdileri kontrol edip tekrar deneyebilirsiniz.</div>\n<pre>{}</pre>\n{}",
        escape_html(&error.diagnostic()),
        form(input)
    );
    layout(&body)
}

pub fn configuration_error_page(error: &ConfigurationError) -> String {
    let body = format!(
        "<div class=\"warning\"><strong>Model dosyaları yüklenemedi.</strong> \
         Uygulama yapılandırması düzeltilene kadar tahmin yapılamaz.</div>\n<pre>{}</pre>\n",
        escape_html(&error.to_string())
    );
    layout(&body)
}
