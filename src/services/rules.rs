//! Deterministic local analysis.
//!
//! Rules run in a fixed order: base text for the mood, low energy, poor
//! sleep, then note keyword groups. Each step appends one sentence and pushes
//! its suggestions; the final list is deduplicated and capped by
//! [`AiAnalysis::new`].

use crate::models::analysis::AiAnalysis;
use crate::models::check_in::Questionnaire;
use crate::models::mood::{Energia, Humor};

struct Rule {
    sentence: &'static str,
    suggestions: &'static [&'static str],
}

struct KeywordRule {
    keywords: &'static [&'static str],
    rule: Rule,
}

fn base_rule(humor: Humor) -> Rule {
    match humor {
        Humor::MuitoBem => Rule {
            sentence: "Excelente! Você está em um ótimo momento. Continue mantendo esse equilíbrio e compartilhe suas práticas positivas com a equipe.",
            suggestions: &[
                "Trilha de Liderança Inspiradora",
                "Exercício de Gratidão (10 min)",
                "Meditação de Manutenção (5 min)",
            ],
        },
        Humor::Bem => Rule {
            sentence: "Você está bem! Seu foco está equilibrado. Mantenha as pausas regulares e continue cuidando da sua energia.",
            suggestions: &[
                "Trilha de Produtividade Consciente",
                "Atividade de Alongamento (10 min)",
                "Técnica Pomodoro para Foco",
            ],
        },
        Humor::Normal => Rule {
            sentence: "Estado neutro detectado. Considere introduzir pequenas mudanças na rotina para elevar sua energia e bem-estar.",
            suggestions: &[
                "Trilha de Gestão de Energia",
                "Caminhada Rápida (15 min)",
                "Exercício de Respiração Consciente (5 min)",
            ],
        },
        Humor::Cansado => Rule {
            sentence: "Detectamos sinais de cansaço. É importante priorizar descanso e estabelecer limites saudáveis no trabalho.",
            suggestions: &[
                "Trilha de Recuperação e Descanso",
                "Técnica de Relaxamento Progressivo (15 min)",
                "Reorganização de Prioridades",
                "Pausa para Hidratação e Lanche Saudável",
            ],
        },
        Humor::Exausto => Rule {
            sentence: "Nível crítico de exaustão detectado. Recomendamos fortemente pausas imediatas e considerar conversar com um líder sobre redistribuição de tarefas.",
            suggestions: &[
                "Protocolo de Emergência: Descanso Imediato",
                "Conversa com Líder/RH",
                "Trilha de Prevenção de Burnout",
                "Consulta com Profissional de Saúde Mental",
                "Técnica de Descompressão (20 min)",
            ],
        },
        Humor::Unrecognized => Rule {
            sentence: "Com base nos dados coletados, recomendamos atenção ao seu bem-estar geral.",
            suggestions: &[
                "Trilha de Autoconhecimento",
                "Check-in Emocional Diário",
                "Atividade de Mindfulness (10 min)",
            ],
        },
    }
}

const LOW_ENERGY: Rule = Rule {
    sentence: "Sua energia está baixa. Considere revisar sua alimentação, hidratação e qualidade do sono.",
    suggestions: &["Guia de Nutrição Energética"],
};

const POOR_SLEEP: Rule = Rule {
    sentence: "Qualidade de sono comprometida. O sono é fundamental para recuperação e performance.",
    suggestions: &["Trilha de Higiene do Sono", "Técnicas de Relaxamento Noturno"],
};

const KEYWORD_RULES: [KeywordRule; 3] = [
    KeywordRule {
        keywords: &["pressão", "prazo"],
        rule: Rule {
            sentence: "Detectamos pressão relacionada a prazos. Considere técnicas de gestão de tempo.",
            suggestions: &["Trilha de Gestão de Prazos"],
        },
    },
    KeywordRule {
        keywords: &["conflito", "discussão"],
        rule: Rule {
            sentence: "Situação de conflito identificada. A comunicação assertiva pode ajudar.",
            suggestions: &["Trilha de Comunicação Assertiva", "Mediação de Conflitos"],
        },
    },
    KeywordRule {
        keywords: &["motivação", "desmotivado"],
        rule: Rule {
            sentence: "Questões motivacionais detectadas. Reconectar-se com seus valores pode ajudar.",
            suggestions: &["Trilha de Propósito e Valores", "Reconexão com Objetivos"],
        },
    },
];

#[derive(Default)]
struct Draft {
    text: String,
    suggestions: Vec<String>,
}

impl Draft {
    fn apply(&mut self, rule: &Rule) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(rule.sentence);
        self.suggestions
            .extend(rule.suggestions.iter().map(|s| s.to_string()));
    }
}

/// Maps questionnaire answers to an analysis. Total and pure.
pub fn analyze(input: &Questionnaire) -> AiAnalysis {
    let mut draft = Draft::default();

    draft.apply(&base_rule(input.humor));

    if input.energia == Energia::Baixa {
        draft.apply(&LOW_ENERGY);
    }

    if input.sono.is_poor() {
        draft.apply(&POOR_SLEEP);
    }

    if let Some(note) = input.justificativa.as_deref() {
        let note = note.to_lowercase();
        for group in &KEYWORD_RULES {
            if group.keywords.iter().any(|k| note.contains(k)) {
                draft.apply(&group.rule);
            }
        }
    }

    AiAnalysis::new(draft.text, draft.suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mood::Sono;

    fn questionnaire(humor: Humor, energia: Energia, sono: Sono, note: Option<&str>) -> Questionnaire {
        Questionnaire {
            humor,
            energia,
            sono,
            justificativa: note.map(String::from),
        }
    }

    fn neutral(humor: Humor) -> Questionnaire {
        questionnaire(humor, Energia::Alta, Sono::Bom, None)
    }

    #[test]
    fn base_cases_per_mood() {
        let cases: [(Humor, &str, usize); 6] = [
            (Humor::MuitoBem, "Excelente! Você está em um ótimo momento.", 3),
            (Humor::Bem, "Você está bem! Seu foco está equilibrado.", 3),
            (Humor::Normal, "Estado neutro detectado.", 3),
            (Humor::Cansado, "Detectamos sinais de cansaço.", 4),
            (Humor::Exausto, "Nível crítico de exaustão detectado.", 5),
            (Humor::Unrecognized, "Com base nos dados coletados", 3),
        ];

        for (humor, prefix, count) in cases {
            let result = analyze(&neutral(humor));
            let expected = base_rule(humor);
            assert_eq!(result.text, expected.sentence, "{humor:?}");
            assert!(result.text.starts_with(prefix), "{humor:?}");
            assert_eq!(result.suggestions.len(), count, "{humor:?}");
            assert_eq!(
                result.suggestions,
                expected.suggestions.iter().map(|s| s.to_string()).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn conditional_sentences_follow_fixed_order() {
        let result = analyze(&questionnaire(Humor::Cansado, Energia::Baixa, Sono::Ruim, None));

        let base = result.text.find("Detectamos sinais de cansaço").unwrap();
        let energy = result.text.find("Sua energia está baixa").unwrap();
        let sleep = result.text.find("Qualidade de sono comprometida").unwrap();
        assert!(base < energy && energy < sleep);
        assert_eq!(result.suggestions.len(), 5);
        // Base list (4) fills first; the energy suggestion takes the last slot.
        assert_eq!(result.suggestions[4], "Guia de Nutrição Energética");
    }

    #[test]
    fn very_poor_sleep_counts_as_poor() {
        let result = analyze(&questionnaire(Humor::Bem, Energia::Media, Sono::MuitoRuim, None));
        assert!(result.text.ends_with("fundamental para recuperação e performance."));
        assert_eq!(
            &result.suggestions[3..],
            &["Trilha de Higiene do Sono", "Técnicas de Relaxamento Noturno"]
        );
    }

    #[test]
    fn keyword_groups_fire_once_each() {
        let note = "Muita PRESSÃO com o prazo e uma discussão com o time";
        let result = analyze(&questionnaire(Humor::Bem, Energia::Alta, Sono::Bom, Some(note)));

        assert_eq!(result.text.matches("Detectamos pressão relacionada a prazos.").count(), 1);
        assert!(result.text.contains("Situação de conflito identificada."));
        assert!(!result.text.contains("Questões motivacionais"));
        assert_eq!(
            result.suggestions,
            vec![
                "Trilha de Produtividade Consciente",
                "Atividade de Alongamento (10 min)",
                "Técnica Pomodoro para Foco",
                "Trilha de Gestão de Prazos",
                "Trilha de Comunicação Assertiva",
            ]
        );
    }

    #[test]
    fn motivation_group_matches_inflections() {
        let result = analyze(&questionnaire(
            Humor::Normal,
            Energia::Alta,
            Sono::Regular,
            Some("ando desmotivado"),
        ));
        assert!(result.text.ends_with("Reconectar-se com seus valores pode ajudar."));
    }

    #[test]
    fn repeated_suggestion_appears_once() {
        let mut draft = Draft::default();
        draft.apply(&POOR_SLEEP);
        draft.apply(&Rule {
            sentence: "Outra regra.",
            suggestions: &["Trilha de Higiene do Sono", "Nova"],
        });
        let analysis = AiAnalysis::new(draft.text, draft.suggestions);
        assert_eq!(
            analysis.suggestions,
            vec!["Trilha de Higiene do Sono", "Técnicas de Relaxamento Noturno", "Nova"]
        );
    }

    #[test]
    fn analyze_is_deterministic() {
        let input = questionnaire(Humor::Exausto, Energia::Baixa, Sono::MuitoRuim, Some("conflito"));
        assert_eq!(analyze(&input), analyze(&input));
        assert!(analyze(&input).suggestions.len() <= 5);
    }
}
