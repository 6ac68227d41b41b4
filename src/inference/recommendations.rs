// src/inference/recommendations.rs
use serde::Serialize;

use crate::models::RiskLevel;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

static HIGH_RISK: Recommendations = Recommendations {
    title: "Yüksek Risk İçin Öneriler",
    items: &[
        "Taburculuk öncesi kapsamlı ilaç uzlaştırması yapılmalı.",
        "Taburculuktan sonraki 7 gün içinde kontrol randevusu planlanmalı.",
        "Kan şekeri takibi ve A1C kontrolü sıklaştırılmalı.",
        "Hasta ve yakınlarına diyabet öz yönetim eğitimi verilmeli.",
        "Evde bakım veya telefonla izlem programına yönlendirme değerlendirilmeli.",
    ],
};

static LOW_RISK: Recommendations = Recommendations {
    title: "Düşük Risk İçin Öneriler",
    items: &[
        "Rutin taburculuk planı uygulanabilir.",
        "Taburculuktan sonraki 30 gün içinde standart kontrol randevusu verilmeli.",
        "Düzenli kan şekeri takibi ve ilaç uyumu konusunda bilgilendirme yapılmalı.",
        "Sağlıklı beslenme ve fiziksel aktivite önerileri paylaşılmalı.",
    ],
};

pub fn recommendations_for(risk: RiskLevel) -> &'static Recommendations {
    match risk {
        RiskLevel::High => &HIGH_RISK,
        RiskLevel::Low => &LOW_RISK,
    }
}
