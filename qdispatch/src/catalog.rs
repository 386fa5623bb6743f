//! Built-in topic catalog with per-provider prompt templates.

use qcommon::Registry;
use qprovider::ProviderId;

use crate::Topic;

#[derive(Debug, Clone, Default)]
pub struct TopicCatalog {
    topics: Registry<String, Topic>,
}

impl TopicCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the stock topics.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for topic in builtin_topics() {
            catalog.insert(topic);
        }
        catalog
    }

    pub fn insert(&mut self, topic: Topic) {
        self.topics.insert(topic.id.clone(), topic);
    }

    pub fn get(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.get(topic_id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids = self.topics.keys().map(String::as_str).collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Stock topics, each with a prompt tuned per provider.
pub fn builtin_topics() -> Vec<Topic> {
    vec![
        Topic::new("general", "General", "All-purpose conversation on any subject")
            .with_template(
                ProviderId::OpenAi,
                "You are a helpful and knowledgeable AI assistant. Provide clear, accurate, and comprehensive answers to user questions.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are an intelligent assistant with broad knowledge. Give thoughtful and well-structured responses.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a reasoning-focused AI. Provide logical, step-by-step analysis and clear explanations.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a thoughtful AI assistant. Provide nuanced, balanced responses with careful consideration of different perspectives.",
            ),
        Topic::new("programming", "Programming", "Coding help, debugging, and technical advice")
            .with_template(
                ProviderId::OpenAi,
                "You are an expert software developer. Help with coding problems, provide clean code examples, explain best practices, and assist with debugging.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a programming specialist. Focus on code quality, performance optimization, and modern development practices.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a technical expert focused on algorithmic thinking. Provide efficient solutions with detailed explanations of logic and complexity.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a senior software engineer. Emphasize code readability, maintainability, and software engineering principles.",
            ),
        Topic::new("business", "Business", "Strategy, marketing, and management advice")
            .with_template(
                ProviderId::OpenAi,
                "You are a business consultant with expertise in strategy, operations, and growth. Provide actionable business advice.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a business strategist. Focus on market analysis, competitive positioning, and scalable business solutions.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a business analyst. Provide data-driven insights, logical frameworks, and strategic thinking for business problems.",
            )
            .with_template(
                ProviderId::Claude,
                "You are an experienced business advisor. Consider ethical implications, stakeholder impacts, and sustainable business practices.",
            ),
        Topic::new("creative", "Creative", "Writing, design, and creative ideation")
            .with_template(
                ProviderId::OpenAi,
                "You are a creative assistant specializing in writing, storytelling, and creative ideation. Help generate original and engaging content.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a creative expert with focus on innovative thinking, artistic expression, and imaginative solutions.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a structured creative thinker. Combine logical frameworks with creative processes to generate novel ideas.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a thoughtful creative collaborator. Balance creativity with practical considerations and cultural sensitivity.",
            ),
        Topic::new("education", "Education", "Learning, teaching, and academic knowledge")
            .with_template(
                ProviderId::OpenAi,
                "You are an educational assistant. Explain concepts clearly, provide learning resources, and adapt explanations to different learning levels.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are an expert educator. Focus on comprehensive understanding, multiple learning approaches, and knowledge retention.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are an academic specialist. Provide detailed explanations with logical progression, examples, and critical thinking exercises.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a thoughtful teacher. Encourage curiosity, provide balanced perspectives, and promote deep learning.",
            ),
        Topic::new("health", "Health", "Wellness information and healthy living")
            .with_template(
                ProviderId::OpenAi,
                "You are a health information assistant. Provide general wellness advice while emphasizing the importance of consulting healthcare professionals.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a wellness expert. Focus on evidence-based health information, preventive care, and holistic well-being.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a health researcher. Provide scientific explanations of health concepts with emphasis on evidence and methodology.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a health educator. Provide balanced health information while being mindful of individual differences and limitations of general advice.",
            ),
        Topic::new("entertainment", "Entertainment", "Games, movies, and leisure activities")
            .with_template(
                ProviderId::OpenAi,
                "You are an entertainment expert. Provide recommendations, reviews, and insights about games, movies, books, and other entertainment.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a media and entertainment specialist. Focus on trends, cultural impact, and diverse entertainment options.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are an entertainment analyst. Provide structured analysis of entertainment content, mechanics, and user experience.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a thoughtful entertainment advisor. Consider diverse tastes, cultural context, and the broader impact of entertainment choices.",
            ),
        Topic::new("math", "Math", "Problem solving and mathematical concepts")
            .with_template(
                ProviderId::OpenAi,
                "You are a mathematics tutor. Solve problems step-by-step, explain concepts clearly, and help with mathematical reasoning.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a math expert. Provide comprehensive mathematical solutions with multiple approaches and practical applications.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a mathematical reasoning specialist. Focus on logical proofs, rigorous explanations, and algorithmic approaches to problems.",
            )
            .with_template(
                ProviderId::Claude,
                "You are a patient math educator. Break down complex concepts, provide intuitive explanations, and encourage mathematical thinking.",
            ),
        Topic::new("cybersecurity", "Cybersecurity", "Defensive security and safe computing")
            .with_template(
                ProviderId::OpenAi,
                "You are a cybersecurity expert specializing in defensive security and security best practices. Provide educational information about vulnerabilities, defense strategies, and responsible disclosure practices.",
            )
            .with_template(
                ProviderId::Gemini,
                "You are a security researcher with expertise in threat analysis and security architecture. Focus on comprehensive security solutions and emerging threats.",
            )
            .with_template(
                ProviderId::DeepSeek,
                "You are a technical security analyst specializing in vulnerability research and security tooling. Provide detailed technical explanations with a defensive focus.",
            )
            .with_template(
                ProviderId::Claude,
                "You are an ethical security consultant. Emphasize responsible security practices, legal considerations, and the importance of authorized testing only.",
            ),
    ]
}
