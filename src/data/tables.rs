//! 内置物品 / 法术 / 状态表

use super::schema::{ConditionTemplate, SpellTemplate};
use crate::inventory::components::{Item, ItemKind, Usage};

// (名字, 占格, 宽, 高, 伤害, 使用点, 描述)
const WEAPONS: &[(&str, u32, usize, usize, &str, u32, &str)] = &[
    ("Dagger", 1, 1, 1, "d6", 3, "Light"),
    ("Needle", 1, 1, 1, "d6", 3, "Light"),
    ("Spoon", 1, 1, 1, "d6", 3, "Light"),
    ("Fishhook", 1, 1, 1, "d6", 3, "Light"),
    ("Rolling pin", 1, 1, 1, "d6", 3, "Light"),
    ("Sword", 1, 1, 1, "d6/d8", 3, "Light, versatile"),
    ("Spear", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Club", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Hammer", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Saw", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Crook", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Axe", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Staff", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Hatchet", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Halberd", 2, 2, 1, "d10", 3, "Heavy"),
    ("Heavy hammer", 2, 2, 1, "d10", 3, "Heavy"),
    ("Trashhook", 2, 2, 1, "d10", 3, "Heavy"),
    ("Pickaxe", 1, 2, 1, "d6/d8", 3, "Medium"),
    ("Sling", 1, 1, 1, "d6", 3, "Ranged"),
    ("Bow", 1, 2, 1, "d8", 3, "Heavy ranged"),
    ("Light crossbow", 1, 1, 1, "d6", 3, "Ranged"),
    ("Heavy crossbow", 2, 2, 1, "d10", 3, "Heavy ranged"),
];

// (名字, 占格, 宽, 高, 防御, 使用点, 描述)
const ARMOUR: &[(&str, u32, usize, usize, u32, u32, &str)] = &[
    ("Shield", 1, 1, 1, 1, 3, "Light, +1 armour"),
    ("Lead coat", 1, 2, 1, 1, 3, "Heavy, armour 1"),
    ("Chain mail", 1, 2, 1, 1, 3, "Heavy, armour 1"),
];

// 弹药与杂物共用一个形状：(名字, 占格, 宽, 高, 使用点, 描述)；使用点 0 表示没有
const AMMUNITION: &[(&str, u32, usize, usize, u32, &str)] = &[
    ("Stones, pouch", 1, 1, 1, 3, "Ammunition for slings"),
    ("Arrows, quiver", 1, 1, 1, 3, "Ammunition for bows"),
];

const GEAR: &[(&str, u32, usize, usize, u32, &str)] = &[
    ("Rope", 1, 1, 1, 3, "3 uses"),
    ("Lantern", 1, 1, 1, 3, "3 uses"),
    ("Cookpots", 1, 1, 1, 0, "Cook food"),
    ("Magnifying glass", 1, 1, 1, 0, "Examine small things"),
    ("Bottle of paint", 1, 1, 1, 3, "3 uses"),
    ("Needle & thread", 1, 1, 1, 3, "3 uses"),
    ("Herbs", 1, 1, 1, 3, "Healing, 3 uses"),
    ("Bag of seeds", 1, 1, 1, 0, "Plant things"),
    ("Smoke bomb", 1, 1, 1, 1, "1 use"),
    ("Stink spray", 1, 1, 1, 1, "1 use"),
    ("Net", 1, 1, 1, 0, "Trap creatures"),
    ("Lockpicks", 1, 1, 1, 0, "Pick locks"),
    ("Disguise kit", 1, 1, 1, 3, "3 uses"),
    ("Wire", 1, 1, 1, 3, "3 uses"),
    ("Pliers", 1, 1, 1, 0, "Grip and bend"),
    ("Compass", 1, 1, 1, 0, "Find north"),
    ("Spyglass", 1, 1, 1, 0, "See far away"),
    ("Cart", 0, 1, 1, 0, "6 extra inventory slots"),
    ("Jar of honey", 1, 1, 1, 3, "3 uses, sweet"),
    ("Flask of spirits", 1, 1, 1, 3, "3 uses"),
    ("Musical instrument", 1, 1, 1, 0, "Play music"),
    ("Holy symbol", 1, 1, 1, 0, "Religious icon"),
    ("Glass vials", 1, 1, 1, 3, "3 uses"),
    ("Silver mirror", 1, 1, 1, 0, "Reflect light"),
    ("Torches", 1, 1, 1, 3, "Mark usage every 6 Turns"),
    ("Rations", 1, 1, 1, 3, "Mark usage after a meal"),
    ("Bedroll", 1, 1, 1, 0, "Comfortable sleeping"),
    ("Caltrops", 1, 1, 1, 3, "3 uses, slow pursuers"),
    ("Chalk", 1, 1, 1, 3, "3 uses, mark surfaces"),
    ("Chisel", 1, 1, 1, 0, "Carve stone"),
    ("Crowbar", 1, 1, 1, 0, "Pry things open"),
    ("Fishing rod", 1, 1, 1, 0, "Catch fish"),
    ("Glue", 1, 1, 1, 3, "3 uses, stick things"),
    ("Grappling hook", 1, 1, 1, 0, "Climb, hook things"),
    ("Ink & quill", 1, 1, 1, 3, "3 uses, write things"),
    ("Iron spikes", 1, 1, 1, 3, "3 uses, secure doors"),
    ("Metal file", 1, 1, 1, 0, "File through metal"),
    ("Parchment", 1, 1, 1, 3, "3 uses, write on"),
    ("Pole", 1, 2, 1, 0, "10 feet, prod things"),
    ("Pulleys", 1, 1, 1, 0, "Lift heavy things"),
    ("Tent", 1, 2, 1, 0, "Shelter for 2 mice"),
    ("Tinderbox", 1, 1, 1, 0, "Light fires"),
    ("Twine", 1, 1, 1, 3, "3 uses, tie things"),
    ("Waterskin", 1, 1, 1, 3, "3 uses, carry water"),
];

// (名字, 描述, 充能)
const SPELLS: &[(&str, &str, &str)] = &[
    (
        "Fireball",
        "Shoot a fireball up to 24\". Deal [SUM] + [DICE] damage to all creatures within 6\".",
        "Burn a piece of wood",
    ),
    (
        "Heal",
        "Heal [SUM] STR damage and remove the Injured Condition from a creature.",
        "Bandage a wound",
    ),
    (
        "Magic Missile",
        "Deal [SUM] + [DICE] damage to a creature within sight.",
        "Break an item made of glass",
    ),
    (
        "Fear",
        "Give the Frightened Condition to [DICE] creatures.",
        "Scare an animal",
    ),
    (
        "Darkness",
        "Create a [SUM] x 2\" diameter sphere of pure darkness for [DICE] Turns.",
        "Sit alone in the dark for a Turn",
    ),
    (
        "Restore",
        "Remove Exhausted or Frightened Condition from [DICE] + 1 creatures.",
        "Eat a hearty meal",
    ),
    (
        "Be Understood",
        "Make your meaning clear to [DICE] creatures of another species for [DICE] Turns.",
        "Have a conversation with someone new",
    ),
    (
        "Ghost Beetle",
        "Create an illusory beetle that can carry 6 inventory slots for [DICE] x 6 Turns.",
        "Catch a beetle",
    ),
    (
        "Light",
        "Force [DICE] creatures to make a WIL save or become stunned. Alternately, create light as bright as a torch for [SUM] turns.",
        "Look at the sun",
    ),
    (
        "Invisible Ring",
        "Creates [DICE] x 6\" ring of force. It is invisible and immovable. Lasts [DICE] Turns.",
        "Tie a knot in a rope",
    ),
    (
        "Knock",
        "Open a door or container, as if a Save were made with STR score of 10 + [DICE] x 4.",
        "Open a lock with a key",
    ),
    (
        "Grease",
        "Cover [DICE] x 6\" area in slippery, flammable grease. Creatures in the area must make a DEX save or fall prone.",
        "Oil a squeaky hinge",
    ),
    (
        "Grow",
        "Grow a creature to [DICE] + 1 times its original size for 1 Turn.",
        "Water a plant",
    ),
    (
        "Invisibility",
        "Make creature invisible for [DICE] Turns. Any movement reduces duration by 1 Turn.",
        "Close your eyes for a Turn",
    ),
    (
        "Catnip",
        "Turn object into an irresistible lure for cats. Lasts [DICE] Turns.",
        "Pet a cat",
    ),
];

// (名字, 效果, 解除方式)
const CONDITIONS: &[(&str, &str, &str)] = &[
    ("Exhausted", "Disadvantage on all saves. Cannot benefit from short rests.", "Full rest at a safe haven."),
    ("Frightened", "Disadvantage on WIL saves. Must flee from source of fear.", "Short rest in a safe location."),
    ("Hungry", "Disadvantage on STR saves. Cannot benefit from rests.", "Eat a ration."),
    ("Injured", "Disadvantage on STR and DEX saves.", "Full rest with medical treatment."),
    ("Sick", "Disadvantage on all saves. Cannot benefit from rests.", "Herbal remedy or full rest at a safe haven."),
];

fn row(name: &str, kind: ItemKind, slots: u32, size: (usize, usize), uses: u32, desc: &str) -> Item {
    Item {
        name: name.to_string(),
        kind,
        slots,
        width: size.0,
        height: size.1,
        usage: (uses > 0).then(|| Usage::new(uses)),
        description: Some(desc.to_string()),
    }
}

/// 武器、护甲、弹药、杂物，按表内顺序
pub fn items() -> Vec<Item> {
    let weapons = WEAPONS.iter().map(|&(name, slots, w, h, damage, uses, desc)| {
        let kind = ItemKind::Weapon {
            damage: damage.to_string(),
        };
        row(name, kind, slots, (w, h), uses, desc)
    });
    let armour = ARMOUR.iter().map(|&(name, slots, w, h, defence, uses, desc)| {
        row(name, ItemKind::Armour { defence }, slots, (w, h), uses, desc)
    });
    let gear = AMMUNITION
        .iter()
        .chain(GEAR)
        .map(|&(name, slots, w, h, uses, desc)| row(name, ItemKind::Gear, slots, (w, h), uses, desc));

    weapons.chain(armour).chain(gear).collect()
}

pub fn spells() -> Vec<SpellTemplate> {
    SPELLS
        .iter()
        .map(|&(name, description, recharge)| SpellTemplate {
            name: name.to_string(),
            description: description.to_string(),
            recharge: recharge.to_string(),
        })
        .collect()
}

pub fn conditions() -> Vec<ConditionTemplate> {
    CONDITIONS
        .iter()
        .map(|&(name, effect, clear)| ConditionTemplate {
            name: name.to_string(),
            effect: effect.to_string(),
            clear: clear.to_string(),
        })
        .collect()
}
