use super::*;

fn confirm_all(machine: &mut PanelStateMachine) {
    for name in machine.variant().panel_order() {
        machine.confirm_panel(*name).expect("confirm");
    }
}

#[test]
fn starts_with_only_first_panel_open() {
    let machine = PanelStateMachine::new(WorkflowVariant::ModelParameters);
    let panels = machine.panels();
    assert_eq!(panels.len(), 4);
    assert!(panels[0].is_open && panels[0].editable && !panels[0].confirmed);
    for panel in &panels[1..] {
        assert!(!panel.is_open && !panel.editable && !panel.confirmed);
    }
    assert!(!machine.is_ready_to_submit());
}

#[test]
fn confirming_opens_the_successor() {
    for variant in [WorkflowVariant::ModelParameters, WorkflowVariant::FileUpload] {
        let mut machine = PanelStateMachine::new(variant);
        let order = variant.panel_order();
        for (index, name) in order.iter().enumerate() {
            machine.confirm_panel(*name).expect("confirm");
            let current = machine.panel(*name).expect("panel");
            assert!(current.confirmed && !current.editable);
            if let Some(next) = order.get(index + 1) {
                let next = machine.panel(*next).expect("next");
                assert!(next.is_open && next.editable);
            }
            assert_eq!(machine.is_ready_to_submit(), index + 1 == order.len());
        }
    }
}

#[test]
fn cannot_confirm_out_of_order() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::ModelParameters);
    let err = machine.confirm_panel(PanelName::StandInfo).unwrap_err();
    assert_eq!(
        err,
        PanelError::PredecessorUnconfirmed {
            panel: PanelName::StandInfo,
            predecessor: PanelName::SiteInfo,
        }
    );
    assert!(!machine.panel(PanelName::StandInfo).expect("panel").confirmed);
}

#[test]
fn unknown_panel_is_rejected() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::FileUpload);
    assert_eq!(
        machine.confirm_panel(PanelName::SpeciesInfo),
        Err(PanelError::UnknownPanel(PanelName::SpeciesInfo))
    );
}

#[test]
fn editing_invalidates_every_successor() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::ModelParameters);
    confirm_all(&mut machine);
    assert!(machine.is_ready_to_submit());

    machine.edit_panel(PanelName::SiteInfo).expect("edit");

    let site = machine.panel(PanelName::SiteInfo).expect("site");
    assert!(site.editable && site.is_open && !site.confirmed);
    for name in [PanelName::StandInfo, PanelName::ReportInfo] {
        let panel = machine.panel(name).expect("panel");
        assert!(!panel.confirmed && !panel.editable && !panel.is_open);
    }
    assert!(machine.panel(PanelName::SpeciesInfo).expect("species").confirmed);
    assert!(!machine.is_ready_to_submit());
}

#[test]
fn editable_panels_always_follow_a_confirmed_one() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::ModelParameters);
    let steps = [
        (true, PanelName::SpeciesInfo),
        (true, PanelName::SiteInfo),
        (false, PanelName::SpeciesInfo),
        (true, PanelName::SpeciesInfo),
        (true, PanelName::SiteInfo),
        (true, PanelName::StandInfo),
        (false, PanelName::SiteInfo),
    ];
    for (confirm, name) in steps {
        let _ = if confirm {
            machine.confirm_panel(name)
        } else {
            machine.edit_panel(name)
        };
        let panels = machine.panels();
        for pair in panels.windows(2) {
            if pair[1].editable {
                assert!(pair[0].confirmed, "{} editable before {} confirmed", pair[1].name, pair[0].name);
            }
        }
    }
}

#[test]
fn reset_restores_initial_layout() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::FileUpload);
    confirm_all(&mut machine);
    machine.reset();
    assert_eq!(machine, PanelStateMachine::new(WorkflowVariant::FileUpload));
}

#[test]
fn confirmed_panel_cannot_be_confirmed_again() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::ModelParameters);
    confirm_all(&mut machine);
    let before = machine.clone();

    assert_eq!(
        machine.confirm_panel(PanelName::SpeciesInfo),
        Err(PanelError::NotEditable(PanelName::SpeciesInfo))
    );
    assert_eq!(machine, before);
    let site = machine.panel(PanelName::SiteInfo).expect("site");
    assert!(site.confirmed && !site.editable);
}

#[test]
fn reconfirming_after_edit_reopens_only_the_next_panel() {
    let mut machine = PanelStateMachine::new(WorkflowVariant::ModelParameters);
    confirm_all(&mut machine);
    machine.edit_panel(PanelName::SpeciesInfo).expect("edit");
    machine.confirm_panel(PanelName::SpeciesInfo).expect("reconfirm");

    let site = machine.panel(PanelName::SiteInfo).expect("site");
    assert!(site.is_open && site.editable && !site.confirmed);
    assert!(!machine.is_ready_to_submit());
}
