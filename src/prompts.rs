pub const TEXT_SYSTEM: &str = include_str!("../data/prompts/text_system.txt");
pub const IMAGE_SYSTEM: &str = include_str!("../data/prompts/image_system.txt");
pub const IMAGE_USER: &str = include_str!("../data/prompts/image_user.txt");
